//! Entries of the `/` resource index.

use serde::Serialize;
use utoipa::ToSchema;

/// One entry of the API index.
#[derive(Debug, Serialize, ToSchema)]
pub struct RouteDescriptor {
    /// Path of the resource.
    pub href: String,
    /// HTTP methods it accepts.
    pub methods: Vec<String>,
}

impl RouteDescriptor {
    /// Entry for `href` answering `methods`.
    pub fn new(href: &str, methods: &[&str]) -> Self {
        Self {
            href: href.into(),
            methods: methods.iter().map(|method| (*method).into()).collect(),
        }
    }
}
