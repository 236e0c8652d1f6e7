//! Utility macros for reducing boilerplate

/// Implement `FromRef<AppState>` for a piece of state, so handlers can
/// extract it directly.
///
/// # Example
/// ```ignore
/// impl_from_ref!(DbClient, db);
/// // Expands to:
/// impl axum::extract::FromRef<AppState> for DbClient {
///     fn from_ref(state: &AppState) -> Self {
///         state.db.clone()
///     }
/// }
/// ```
#[macro_export]
macro_rules! impl_from_ref {
    ($type:ty, $field:ident) => {
        impl axum::extract::FromRef<$crate::state::AppState> for $type {
            fn from_ref(state: &$crate::state::AppState) -> Self {
                state.$field.clone()
            }
        }
    };
}
