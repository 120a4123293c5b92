//! Stems repository. Stems are seed data and read-only at runtime.

use super::observe;
use crate::errors::WsError;
use crate::models::Stem;
use common::types::StemId;
use sqlx::PgPool;
use std::time::Instant;
use tracing::instrument;

pub struct StemsRepository;

impl StemsRepository {
    #[instrument(skip_all, name = "ws.repo.list_stems")]
    pub async fn list(pool: &PgPool) -> Result<Vec<Stem>, WsError> {
        let start = Instant::now();

        let result = sqlx::query_as::<_, Stem>("SELECT stem_id, name FROM stem ORDER BY name")
            .fetch_all(pool)
            .await;

        observe("list_stems", start, result)
    }

    #[instrument(skip_all, name = "ws.repo.get_stem")]
    pub async fn find_by_id(pool: &PgPool, id: StemId) -> Result<Option<Stem>, WsError> {
        let start = Instant::now();

        let result = sqlx::query_as::<_, Stem>("SELECT stem_id, name FROM stem WHERE stem_id = $1")
            .bind(id.as_uuid())
            .fetch_optional(pool)
            .await;

        observe("get_stem", start, result)
    }
}
