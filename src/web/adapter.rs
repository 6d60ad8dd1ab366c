//! Request adapter for mapping HTTP requests to blog types.

use std::collections::HashMap;

use crate::model::PostForm;
use crate::request::{Principal, RequestMeta};
use crate::Tainted;

use super::{ExtractMetadata, ExtractTaintedInputs};

/// HTTP method of a blog request.
///
/// Every mutating route answers `GET` with a form or confirmation page and
/// acts on `POST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Show the form or confirmation page
    Get,
    /// Submit it
    Post,
}

/// Framework-agnostic view of one blog request.
///
/// Framework integrations implement `From<FrameworkRequest>` for this type
/// (or fill it with the builder-style setters). The principal comes from the
/// session layer; form fields stay raw until [`extract_tainted_inputs`]
/// wraps them.
///
/// [`extract_tainted_inputs`]: ExtractTaintedInputs::extract_tainted_inputs
///
/// # Examples
///
/// ```
/// use blog_policy::web::{ExtractMetadata, ExtractTaintedInputs, Method, RequestAdapter};
/// use blog_policy::{Principal, UserId};
///
/// let mut adapter = RequestAdapter::new("req-12345", Method::Post, "/post/new");
/// adapter.set_principal(Principal::user(UserId(1)));
/// adapter.add_form_field("title", "Hello");
///
/// let meta = adapter.extract_metadata();
/// assert_eq!(meta.request_id, "req-12345");
///
/// let form = adapter.extract_tainted_inputs();
/// assert!(form.contains("title"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestAdapter {
    request_id: String,
    principal: Principal,
    method: Method,
    url: String,
    form: HashMap<String, String>,
}

impl RequestAdapter {
    /// Creates an adapter for an anonymous request with no form fields.
    pub fn new(request_id: impl Into<String>, method: Method, url: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            principal: Principal::anonymous(),
            method,
            url: url.into(),
            form: HashMap::new(),
        }
    }

    /// Sets the principal resolved by the session layer.
    pub fn set_principal(&mut self, principal: Principal) {
        self.principal = principal;
    }

    /// Adds a submitted form field.
    pub fn add_form_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.form.insert(name.into(), value.into());
    }

    /// Returns the request ID.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the acting principal.
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the requested URL, used as the `next` target of login redirects.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ExtractMetadata for RequestAdapter {
    fn extract_metadata(&self) -> RequestMeta {
        RequestMeta {
            request_id: self.request_id.clone(),
            principal: self.principal,
        }
    }
}

impl ExtractTaintedInputs for RequestAdapter {
    fn extract_tainted_inputs(&self) -> TaintedForm {
        TaintedForm {
            fields: self
                .form
                .iter()
                .map(|(k, v)| (k.clone(), Tainted::new(v.clone())))
                .collect(),
        }
    }
}

/// Submitted form fields, every value wrapped in [`Tainted`].
#[derive(Debug, Clone, Default)]
pub struct TaintedForm {
    fields: HashMap<String, Tainted<String>>,
}

impl TaintedForm {
    /// Returns a field; an absent field reads as an empty string.
    pub fn field(&self, name: &str) -> Tainted<String> {
        self.fields
            .get(name)
            .cloned()
            .unwrap_or_else(|| Tainted::new(String::new()))
    }

    /// Returns true if the field was submitted.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of submitted fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if nothing was submitted.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Collects the create/edit post fields: `title`, `subtitle`, `body`, `img_url`.
    pub fn post_form(&self) -> PostForm {
        PostForm {
            title: self.field("title"),
            subtitle: self.field("subtitle"),
            body: self.field("body"),
            img_url: self.field("img_url"),
        }
    }
}
