/// Router Module Index
///
/// Routes are split by access tier so that the admin guard is applied to a
/// whole router at once rather than per route.

/// Routes open to anonymous visitors. Listings go through the public scope,
/// so unapproved reviews never appear here.
pub mod public;

/// Routes under `/api/admin`. Wrapped in `guard::admin_api_guard`; every
/// handler re-checks the role through the service layer as well.
pub mod admin;
