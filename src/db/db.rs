use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use std::time::Duration;

use crate::common::{ContributionError, GeneralError, MemberError, UserError};
use crate::log_err;
use crate::models::{
    Contribution, ContributionCreate, ContributionQuery, ContributionRow, Member, MemberCreate,
    MemberUpdate, Profile, Registration, User, UserIden,
};

#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
}

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

fn has_code(err: &sqlx::Error, code: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(code),
        _ => false,
    }
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, GeneralError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---------------------------------------------------------------- users

    /// Creates the account and its profile together; neither exists on failure.
    pub async fn register(&self, data: &Registration) -> Result<(User, Profile), UserError> {
        let email = data.email.trim().to_lowercase();
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash) VALUES ($1, $2)
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&email)
        .bind(&data.password_hash)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user) = user else {
            return Err(UserError::AlreadyExists(email.into()));
        };

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, name, email, phone, is_admin)
            VALUES ($1, $2, $3, $4, false)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(data.name.trim())
        .bind(&email)
        .bind(data.phone.trim())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((user, profile))
    }

    pub async fn get_user(&self, data: &UserIden) -> Result<User, UserError> {
        let (id, email): (Option<Uuid>, Option<String>) = match data {
            UserIden::Id(id) => (Some(*id), None),
            UserIden::Email(email) => (None, Some(email.trim().to_lowercase())),
        };

        let result = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1 OR email = $2"#)
            .bind(id)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        result.ok_or_else(|| UserError::NotFound(data.clone()))
    }

    // -------------------------------------------------------------- members

    pub async fn add_member(&self, data: &MemberCreate) -> Result<Member, MemberError> {
        let name = data.name.trim();
        let email = data.email.trim().to_lowercase();

        if name.is_empty() || email.is_empty() {
            return Err(MemberError::InvalidRequest("Name and email are required".into()));
        }

        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (name, email) VALUES ($1, $2)
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(&email)
        .fetch_optional(&self.pool)
        .await?;

        member.ok_or(MemberError::AlreadyExists(email))
    }

    pub async fn update_member(&self, data: &MemberUpdate) -> Result<Member, MemberError> {
        if data.is_empty() {
            return Err(MemberError::InvalidRequest("No fields provided".into()));
        }

        let result = sqlx::query_as::<_, Member>(
            r#"
            UPDATE members
            SET
                name = COALESCE($1, name),
                email = COALESCE($2, email)
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(data.name.as_deref().map(str::trim))
        .bind(data.email.as_deref().map(|e| e.trim().to_lowercase()))
        .bind(data.id)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(m)) => Ok(m),

            Ok(None) => Err(MemberError::NotFound(data.id)),

            Err(e) if has_code(&e, UNIQUE_VIOLATION) => {
                let err = match &data.email {
                    Some(email) => MemberError::AlreadyExists(email.clone()),
                    None => {
                        log_err!(self.pool, data.clone());
                        MemberError::Internal
                    }
                };

                Err(err)
            }

            Err(e) => Err(MemberError::Database(e)),
        }
    }

    // -------------------------------------------------------- contributions

    pub async fn add_contribution(
        &self,
        data: &ContributionCreate,
    ) -> Result<Contribution, ContributionError> {
        if data.amount_cents <= 0 {
            return Err(ContributionError::InvalidAmount(data.amount_cents));
        }

        let result = sqlx::query_as::<_, Contribution>(
            r#"
            INSERT INTO contributions (member_id, amount_cents, date, week, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(data.member_id)
        .bind(data.amount_cents)
        .bind(data.date)
        .bind(&data.week)
        .bind(data.description.as_deref())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(c) => Ok(c),
            Err(e) if has_code(&e, FOREIGN_KEY_VIOLATION) => {
                Err(ContributionError::MemberNotFound(data.member_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Records a batch of contributions atomically: either every row is
    /// inserted or none is.
    pub async fn record_contributions(
        &self,
        entries: &[ContributionCreate],
    ) -> Result<Vec<Contribution>, ContributionError> {
        if let Some(bad) = entries.iter().find(|e| e.amount_cents <= 0) {
            return Err(ContributionError::InvalidAmount(bad.amount_cents));
        }

        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(entries.len());

        for data in entries {
            let result = sqlx::query_as::<_, Contribution>(
                r#"
                INSERT INTO contributions (member_id, amount_cents, date, week, description)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(data.member_id)
            .bind(data.amount_cents)
            .bind(data.date)
            .bind(&data.week)
            .bind(data.description.as_deref())
            .fetch_one(&mut *tx)
            .await;

            match result {
                Ok(c) => saved.push(c),
                Err(e) if has_code(&e, FOREIGN_KEY_VIOLATION) => {
                    return Err(ContributionError::MemberNotFound(data.member_id));
                }
                Err(e) => return Err(e.into()),
            }
        }

        tx.commit().await?;

        Ok(saved)
    }

    pub async fn get_contributions(
        &self,
        data: &ContributionQuery,
    ) -> Result<Vec<ContributionRow>, ContributionError> {
        if data.is_empty() {
            return Err(ContributionError::InvalidRequest("No fields provided".into()));
        }

        if data.limit.is_some_and(|limit| limit < 0) {
            return Err(ContributionError::InvalidRequest(
                "Pagination 'limit' is negative integer".into(),
            ));
        }

        if data.offset.is_some_and(|offset| offset < 0) {
            return Err(ContributionError::InvalidRequest(
                "Pagination 'offset' is negative integer".into(),
            ));
        }

        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT
                c.id, c.member_id, m.name AS member_name, m.email AS member_email,
                c.amount_cents, c.date, c.week, c.description
            FROM contributions c
            JOIN members m ON m.id = c.member_id
            WHERE "#,
        );
        let mut separated = query_builder.separated(" AND ");

        if let Some(member_id) = data.member_id {
            separated
                .push("c.member_id = ")
                .push_bind_unseparated(member_id);
        }

        if let Some(week) = &data.week {
            separated.push("c.week = ").push_bind_unseparated(week.clone());
        }

        if let Some(date) = data.date {
            separated.push("c.date >= ").push_bind_unseparated(date);
        }

        if let Some(amount) = data.amount_cents {
            separated
                .push("c.amount_cents >= ")
                .push_bind_unseparated(amount);
        }

        if let Some(sort_params) = &data.sort_by {
            // offset, limit and sort_by are not columns
            if sort_params.len() > ContributionQuery::sortable_len() {
                return Err(ContributionError::InvalidRequest(format!(
                    "Sort parameters exceed maximum limit of {}.",
                    ContributionQuery::sortable_len()
                )));
            }

            let active_sorts: Vec<_> = ContributionQuery::fields()
                .iter()
                .zip(sort_params.iter())
                .filter_map(|(&col, &dir)| dir.map(|is_asc| (col, is_asc)))
                .collect();

            if active_sorts.is_empty() {
                query_builder.push(" ORDER BY c.date DESC ");
            } else {
                query_builder.push(" ORDER BY ");
                let mut separator = query_builder.separated(", ");

                for (col_name, is_asc) in active_sorts {
                    let direction = if is_asc { " ASC" } else { " DESC" };
                    separator.push(format!("c.{} {}", col_name, direction));
                }
            }
        } else {
            query_builder.push(" ORDER BY c.date DESC ");
        }

        if let Some(limit) = data.limit {
            query_builder.push(" LIMIT ").push_bind(limit);
        }

        if let Some(offset) = data.offset {
            query_builder.push(" OFFSET ").push_bind(offset);
        }

        let rows = query_builder
            .build_query_as::<ContributionRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
