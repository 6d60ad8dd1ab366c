//! Extraction boundary traits for web integration.

use crate::request::RequestMeta;

use super::TaintedForm;

/// Extracts request metadata from a framework-specific request.
///
/// Maps the framework's request id and session user onto [`RequestMeta`].
/// It does not authorize anything; that is the gate's job.
///
/// # Examples
///
/// ```
/// use blog_policy::web::ExtractMetadata;
/// use blog_policy::{Principal, RequestMeta, UserId};
///
/// struct MyFrameworkRequest {
///     request_id: String,
///     session_user: Option<i64>,
/// }
///
/// impl ExtractMetadata for MyFrameworkRequest {
///     fn extract_metadata(&self) -> RequestMeta {
///         RequestMeta {
///             request_id: self.request_id.clone(),
///             principal: match self.session_user {
///                 Some(id) => Principal::user(UserId(id)),
///                 None => Principal::anonymous(),
///             },
///         }
///     }
/// }
///
/// let req = MyFrameworkRequest { request_id: "r".into(), session_user: Some(1) };
/// assert!(req.extract_metadata().principal.authenticated);
/// ```
pub trait ExtractMetadata {
    /// Extracts the request id and acting principal.
    fn extract_metadata(&self) -> RequestMeta;
}

/// Extracts submitted form fields, each wrapped in [`Tainted`](crate::Tainted).
///
/// Every value that crosses the HTTP boundary is untrusted until it is
/// validated or sanitized.
pub trait ExtractTaintedInputs {
    /// Extracts all untrusted form fields from the request.
    fn extract_tainted_inputs(&self) -> TaintedForm;
}
