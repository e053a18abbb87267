//! Shared helpers and macros for Diesel repository implementations.
//!
//! Provides error-message extraction for pool and Diesel failures, unique
//! violation detection for duplicate slugs and codes, and the dispatch macro
//! that maps an [`AttributeKind`](crate::domain::catalog::AttributeKind) onto
//! its reference and junction tables.

use tracing::debug;

use super::pool::PoolError;

/// Extract a readable message from a pool error.
pub fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Extract a readable message from a Diesel error and emit debug context.
pub fn map_diesel_error_message(error: diesel::result::Error, operation: &str) -> String {
    let error_message = error.to_string();
    debug!(%error_message, %operation, "diesel operation failed");
    error_message
}

/// Check whether a Diesel error is a unique constraint violation. Adapters
/// use this to turn slug and code collisions into conflict errors.
pub fn is_unique_violation(error: &diesel::result::Error) -> bool {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// Check whether a Diesel error means the connection itself failed rather
/// than the statement.
pub fn is_connection_failure(error: &diesel::result::Error) -> bool {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
            | DieselError::BrokenTransactionManager
    )
}

/// Collect row conversion results, mapping the first error through `map_err`.
pub fn collect_rows<T, E>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E> {
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

/// Expand `$body` once per attribute kind with `$attr` aliased to the kind's
/// reference table module and `$junction` to its product junction table.
///
/// Each arm re-exports the matching `schema` modules under local names, so
/// the body is written once but compiles against the concrete table types.
#[macro_export]
macro_rules! with_attribute_tables {
    ($kind:expr, $attr:ident, $junction:ident, $body:block) => {{
        use $crate::domain::catalog::AttributeKind;
        match $kind {
            AttributeKind::Category => {
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::categories as $attr;
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::product_categories as $junction;
                $body
            }
            AttributeKind::Color => {
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::colors as $attr;
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::product_colors as $junction;
                $body
            }
            AttributeKind::Shape => {
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::shapes as $attr;
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::product_shapes as $junction;
                $body
            }
            AttributeKind::Space => {
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::spaces as $attr;
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::product_spaces as $junction;
                $body
            }
            AttributeKind::PlantType => {
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::plant_types as $attr;
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::product_plant_types as $junction;
                $body
            }
            AttributeKind::PlantSize => {
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::plant_sizes as $attr;
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::product_plant_sizes as $junction;
                $body
            }
            AttributeKind::PlantLight => {
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::plant_light_levels as $attr;
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::product_plant_light_levels as $junction;
                $body
            }
            AttributeKind::PlantCare => {
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::plant_care_levels as $attr;
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::product_plant_care_levels as $junction;
                $body
            }
            AttributeKind::PlantPetSafety => {
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::plant_pet_safety as $attr;
                #[allow(unused_imports, reason = "call sites may use only one table")]
                use $crate::outbound::persistence::schema::product_plant_pet_safety as $junction;
                $body
            }
        }
    }};
}
