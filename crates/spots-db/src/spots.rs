//! Spot search queries against the `spots` table.
//!
//! Both query shapes take the same three positional parameters
//! (`$1` longitude, `$2` latitude, `$3` radius in meters) and project the
//! same columns, including the computed distance, so circle and square
//! responses stay shape-compatible. Caller values are only ever bound as
//! parameters, never spliced into the query text.

use sqlx::PgPool;

use spots_core::QueryMode;

use crate::DbError;

/// One result row: spot columns plus the computed distance from the query
/// point. `coordinates` is selected as text and passed through unmodified.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SpotRow {
    pub id: String,
    pub name: String,
    pub website: Option<String>,
    pub coordinates: String,
    pub description: Option<String>,
    pub rating: f64,
    pub distance_meters: f64,
}

/// Geodesic radius filter: keep rows within `$3` meters of the query point.
const CIRCLE_SQL: &str = "\
    SELECT s.id, s.name, s.website, s.coordinates::text AS coordinates, \
           s.description, s.rating, \
           ST_Distance(s.coordinates, ST_MakePoint($1, $2)::geography) AS distance_meters \
    FROM spots s \
    WHERE ST_DWithin(ST_MakePoint($1, $2)::geography, s.coordinates, $3) \
    ORDER BY distance_meters";

/// Bounding-box filter: convert the radius to degree offsets
/// (111319.0 meters per degree, longitude scaled by cos(lat)) and keep rows
/// whose geometry intersects the resulting envelope. An index-friendly
/// approximation of the circle filter, not a geodesic boundary: corners of
/// the box lie up to ~41% beyond the radius.
const SQUARE_SQL: &str = "\
    SELECT s.id, s.name, s.website, s.coordinates::text AS coordinates, \
           s.description, s.rating, \
           ST_Distance(s.coordinates, q.origin) AS distance_meters \
    FROM spots s, \
         (SELECT $1::double precision AS lon, \
                 $2::double precision AS lat, \
                 ST_MakePoint($1, $2)::geography AS origin, \
                 $3::double precision AS radius) AS q \
    WHERE s.coordinates::geometry && ST_MakeEnvelope( \
              q.lon - q.radius / (111319.0 * COS(RADIANS(q.lat))), \
              q.lat - q.radius / 111319.0, \
              q.lon + q.radius / (111319.0 * COS(RADIANS(q.lat))), \
              q.lat + q.radius / 111319.0, \
              4326) \
    ORDER BY distance_meters";

const fn query_sql(mode: QueryMode) -> &'static str {
    match mode {
        QueryMode::Circle => CIRCLE_SQL,
        QueryMode::Square => SQUARE_SQL,
    }
}

/// Run one spot search and drain the cursor.
///
/// Rows come back ordered by raw distance ascending; the rating near-tie
/// override is applied by the caller after materialization.
///
/// # Errors
///
/// Returns [`DbError::Query`] if the store fails the query and
/// [`DbError::RowDecode`] if any row fails to decode; either way no partial
/// result is returned.
pub async fn search_spots(
    pool: &PgPool,
    mode: QueryMode,
    longitude: f64,
    latitude: f64,
    radius_meters: f64,
) -> Result<Vec<SpotRow>, DbError> {
    let sql = query_sql(mode);
    sqlx::query_as::<_, SpotRow>(sql)
        .bind(longitude)
        .bind(latitude)
        .bind(radius_meters)
        .fetch_all(pool)
        .await
        .map_err(|e| classify(sql, e))
}

fn classify(sql: &'static str, error: sqlx::Error) -> DbError {
    match error {
        e @ (sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_)) => DbError::RowDecode(e),
        e => DbError::Query { sql, source: e },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_and_square_project_the_same_columns() {
        for sql in [CIRCLE_SQL, SQUARE_SQL] {
            for column in ["s.id", "s.name", "s.website", "s.description", "s.rating"] {
                assert!(sql.contains(column), "missing {column} in: {sql}");
            }
            assert!(sql.contains("coordinates::text AS coordinates"));
            assert!(sql.contains("AS distance_meters"));
            assert!(sql.trim_end().ends_with("ORDER BY distance_meters"));
        }
    }

    #[test]
    fn query_shapes_use_their_own_filter() {
        assert!(CIRCLE_SQL.contains("ST_DWithin"));
        assert!(!CIRCLE_SQL.contains("ST_MakeEnvelope"));
        assert!(SQUARE_SQL.contains("ST_MakeEnvelope"));
        assert!(!SQUARE_SQL.contains("ST_DWithin"));
    }

    #[test]
    fn caller_values_are_bound_not_spliced() {
        for sql in [CIRCLE_SQL, SQUARE_SQL] {
            for placeholder in ["$1", "$2", "$3"] {
                assert!(sql.contains(placeholder), "missing {placeholder} in: {sql}");
            }
        }
    }

    #[test]
    fn query_sql_selects_by_mode() {
        assert_eq!(query_sql(QueryMode::Circle), CIRCLE_SQL);
        assert_eq!(query_sql(QueryMode::Square), SQUARE_SQL);
    }

    #[test]
    fn row_decode_errors_are_classified_separately() {
        let decode = classify(
            CIRCLE_SQL,
            sqlx::Error::ColumnNotFound("distance_meters".to_string()),
        );
        assert!(matches!(decode, DbError::RowDecode(_)), "got: {decode:?}");

        let query = classify(CIRCLE_SQL, sqlx::Error::PoolTimedOut);
        assert!(
            matches!(query, DbError::Query { sql, .. } if sql == CIRCLE_SQL),
            "got: {query:?}"
        );
    }
}
