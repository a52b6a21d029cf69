mod common;

use atrs_core::BusinessError;
use atrs_shared::{FareTypeCode, ReserveFlight};
use atrs_store::MemoryStore;
use common::*;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reservations_never_oversell() {
    init_tracing();
    let store = MemoryStore::new();
    let f = flight("ATR101", 33, (9, 0), FareTypeCode::OneWay, 10);
    let key = f.key();
    store.insert_flight(f.clone());
    let svc = Arc::new(service(&store));

    let mut handles = Vec::new();
    for i in 0..25 {
        let svc = svc.clone();
        let f = f.clone();
        handles.push(tokio::spawn(async move {
            let mut r = reservation(vec![ReserveFlight::new(f, vec![adult(&format!("P{}", i))])]);
            svc.register_reservation(&mut r).await
        }));
    }

    let mut succeeded = 0;
    let mut sold_out = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(e) if e.business() == Some(&BusinessError::InsufficientSeats) => sold_out += 1,
            Err(e) => panic!("unexpected error: {:?}", e),
        }
    }

    assert_eq!(succeeded, 10);
    assert_eq!(sold_out, 15);
    assert_eq!(store.flight(&key).await.unwrap().vacant_num, 0);
    assert_eq!(store.passengers().len(), 10);

    let mut numbers: Vec<String> = store
        .reservations()
        .into_iter()
        .filter_map(|r| r.reserve_no)
        .collect();
    numbers.sort();
    numbers.dedup();
    assert_eq!(numbers.len(), 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mixed_party_sizes_conserve_seats() {
    let store = MemoryStore::new();
    let f = flight("ATR101", 33, (9, 0), FareTypeCode::OneWay, 20);
    let key = f.key();
    store.insert_flight(f.clone());
    let svc = Arc::new(service(&store));

    let mut handles = Vec::new();
    for i in 0..12usize {
        let svc = svc.clone();
        let f = f.clone();
        let party = 1 + i % 3;
        handles.push(tokio::spawn(async move {
            let passengers = (0..party).map(|n| adult(&format!("P{}-{}", i, n))).collect();
            let mut r = reservation(vec![ReserveFlight::new(f, passengers)]);
            svc.register_reservation(&mut r).await.map(|_| party)
        }));
    }

    let mut seats_sold = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(party) => seats_sold += party,
            Err(e) => assert_eq!(e.business(), Some(&BusinessError::InsufficientSeats)),
        }
    }

    let vacant = store.flight(&key).await.unwrap().vacant_num;
    assert!(vacant >= 0);
    assert_eq!(vacant as usize + seats_sold, 20);
    assert_eq!(store.passengers().len(), seats_sold);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_opposite_leg_orders_do_not_deadlock() {
    init_tracing();
    let store = MemoryStore::new();
    let a = flight("ATR101", 40, (9, 0), FareTypeCode::OneWay, 100);
    let b = flight("ATR102", 42, (18, 0), FareTypeCode::OneWay, 100);
    store.insert_flight(a.clone());
    store.insert_flight(b.clone());
    let svc = Arc::new(service(&store));

    let mut handles = Vec::new();
    for i in 0..40 {
        let svc = svc.clone();
        let legs = if i % 2 == 0 {
            vec![a.clone(), b.clone()]
        } else {
            vec![b.clone(), a.clone()]
        };
        handles.push(tokio::spawn(async move {
            let legs = legs
                .into_iter()
                .map(|f| ReserveFlight::new(f, vec![adult("ハナコ")]))
                .collect();
            let mut r = reservation(legs);
            svc.register_reservation(&mut r).await
        }));
    }

    let all = join_all(handles);
    let results = tokio::time::timeout(Duration::from_secs(10), all)
        .await
        .expect("reservations deadlocked");
    assert!(results.iter().all(|r| r.is_ok()));

    assert_eq!(store.flight(&a.key()).await.unwrap().vacant_num, 60);
    assert_eq!(store.flight(&b.key()).await.unwrap().vacant_num, 60);
}

async fn join_all<T>(handles: Vec<tokio::task::JoinHandle<T>>) -> Vec<T> {
    let mut out = Vec::with_capacity(handles.len());
    for handle in handles {
        out.push(handle.await.unwrap());
    }
    out
}

#[tokio::test]
async fn test_same_flight_twice_in_one_reservation() {
    let store = MemoryStore::new();
    let f = flight("ATR101", 33, (9, 0), FareTypeCode::OneWay, 3);
    let key = f.key();
    store.insert_flight(f.clone());

    let mut r = reservation(vec![
        ReserveFlight::new(f.clone(), vec![adult("ハナコ"), adult("サクラ")]),
        ReserveFlight::new(f, vec![adult("ユリ"), adult("ツバキ")]),
    ]);
    let err = service(&store).register_reservation(&mut r).await.unwrap_err();

    // Seats are summed across legs that share one inventory row
    assert_eq!(err.business(), Some(&BusinessError::InsufficientSeats));
    assert_eq!(store.flight(&key).await.unwrap().vacant_num, 3);
}
