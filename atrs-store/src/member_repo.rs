use async_trait::async_trait;
use atrs_core::{MemberRepository, StoreError};
use atrs_shared::{Masked, Member};
use sqlx::PgPool;

pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    membership_number: String,
    kana_family_name: String,
    kana_given_name: String,
    gender: String,
    tel: Option<String>,
    mail: Option<String>,
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    async fn find_member(&self, membership_number: &str) -> Result<Option<Member>, StoreError> {
        let row: Option<MemberRow> = sqlx::query_as(
            r#"
            SELECT membership_number, kana_family_name, kana_given_name, gender, tel, mail
            FROM member
            WHERE membership_number = $1
            "#,
        )
        .bind(membership_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(Member {
            membership_number: Masked(row.membership_number.trim().to_string()),
            kana_family_name: row.kana_family_name,
            kana_given_name: row.kana_given_name,
            gender: row.gender.trim().parse().map_err(StoreError::backend)?,
            tel: row.tel.map(Masked),
            mail: row.mail.map(Masked),
        }))
    }
}
