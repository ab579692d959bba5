//! RSVP repository for database operations.

use domain::models::NewRsvp;
use sqlx::PgPool;

use crate::entities::RsvpEntity;
use crate::metrics::QueryTimer;

/// Repository for RSVP-related database operations.
#[derive(Clone)]
pub struct RsvpRepository {
    pool: PgPool,
}

impl RsvpRepository {
    /// Creates a new RsvpRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get all RSVPs, newest first. Dashboard view only.
    pub async fn get_all(&self) -> Result<Vec<RsvpEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_all_rsvps");
        let result = sqlx::query_as::<_, RsvpEntity>(
            r#"
            SELECT id, name, will_attend, number_of_guests,
                   dietary_restrictions, message, is_confirmed, created_at
            FROM rsvps
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a new RSVP from pre-validated, normalized values.
    pub async fn create(&self, rsvp: &NewRsvp) -> Result<RsvpEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_rsvp");
        let result = sqlx::query_as::<_, RsvpEntity>(
            r#"
            INSERT INTO rsvps (name, will_attend, number_of_guests, dietary_restrictions, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, will_attend, number_of_guests,
                      dietary_restrictions, message, is_confirmed, created_at
            "#,
        )
        .bind(&rsvp.name)
        .bind(rsvp.will_attend)
        .bind(rsvp.number_of_guests)
        .bind(&rsvp.dietary_restrictions)
        .bind(&rsvp.message)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set the confirmed flag on an RSVP.
    pub async fn set_confirmation(
        &self,
        id: i64,
        confirmed: bool,
    ) -> Result<Option<RsvpEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_rsvp_confirmation");
        let result = sqlx::query_as::<_, RsvpEntity>(
            r#"
            UPDATE rsvps
            SET is_confirmed = $2
            WHERE id = $1
            RETURNING id, name, will_attend, number_of_guests,
                      dietary_restrictions, message, is_confirmed, created_at
            "#,
        )
        .bind(id)
        .bind(confirmed)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an RSVP. Returns true when a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_rsvp");
        let result = sqlx::query("DELETE FROM rsvps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|done| done.rows_affected() > 0);
        timer.record();
        result
    }
}
