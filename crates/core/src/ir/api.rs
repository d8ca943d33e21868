//! Lowered operation IR.
//!
//! - RestCallDescriptor: the wire-level call, one per operation
//! - MethodVariant: one caller-visible method signature
//! - LoweredOperation: a descriptor plus all of its variants

use std::sync::Arc;

use opgen_common::{HttpMethod, ParameterLocation};
use serde::Serialize;

use super::types::IrType;

/// Boundary transcoding required for a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TranscodeTag {
    /// Base64-url encoded bytes.
    Base64Url,
    /// RFC1123 date-time text.
    DateTimeRfc1123,
    /// Unix time, whether carried as an integer or a date-time.
    UnixTime,
}

/// The operation's category, decided once per operation.
///
/// Priority when several markers are set: resumable, paging, simulated
/// paging, long-running, simple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationCategory {
    /// Plain request/response.
    Simple,
    /// Native or next-link paging.
    Paging,
    /// A single-response list presented as one page.
    SimulatedPaging,
    /// Completion is polled after the initial request.
    LongRunning,
    /// Re-attach to a long-running operation from a persisted handle.
    Resumable,
}

/// A parameter bound on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestParameter {
    /// Documentation.
    pub description: String,
    /// Wire type.
    #[serde(rename = "type")]
    pub ty: IrType,
    /// Expression that supplies the value at the call site.
    pub variable_name: String,
    /// Wire location.
    pub location: ParameterLocation,
    /// Name on the wire.
    pub serialized_name: String,
    /// The value is already encoded and must not be URL-encoded again.
    pub skip_url_encoding: bool,
    /// Constant baked into the call.
    pub constant: bool,
    /// Callers must supply a value.
    pub required: bool,
    /// Sourced from a shared client property.
    pub client_property: bool,
    /// Prefix for map-valued header collections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_collection_prefix: Option<String>,
}

/// The canonical wire-level call for one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestCallDescriptor {
    /// Resolved method name (camel case).
    pub name: String,
    /// HTTP verb.
    pub http_method: HttpMethod,
    /// URL template with leading slashes trimmed.
    pub url_path: String,
    /// Bound parameters; path parameters first.
    pub parameters: Vec<RestParameter>,
    /// Sorted, distinct expected status codes.
    pub expected_status_codes: Vec<u16>,
    /// Exception raised for error responses, if an error body is declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_type: Option<IrType>,
    /// Return type of the wire call.
    pub return_type: IrType,
    /// Request content type.
    pub content_type: String,
    /// Summary and description joined by a newline.
    pub description: String,
    /// Category decided for this operation.
    pub category: OperationCategory,
    /// Native paging operation.
    pub is_paging: bool,
    /// The paired "fetch next page" operation.
    pub is_paging_next: bool,
    /// List operation presented as a single page.
    pub simulate_as_paging: bool,
    /// Long-running operation.
    pub is_long_running: bool,
    /// Resumable long-running operation.
    pub is_resumable: bool,
    /// Boundary transcoding for the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcode: Option<TranscodeTag>,
}

impl RestCallDescriptor {
    /// Name of the reactive and callback async variants.
    pub fn simple_async_name(&self) -> String {
        format!("{}Async", self.name)
    }

    /// Name of the variant returning the raw response envelope.
    pub fn rest_response_name(&self) -> String {
        format!("{}WithRestResponseAsync", self.name)
    }

    /// Name of the variant fetching a single page.
    pub fn single_page_name(&self) -> String {
        format!("{}SinglePageAsync", self.name)
    }
}

/// A formal parameter of a caller-visible method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodParameter {
    /// Documentation.
    pub description: String,
    /// Client type.
    #[serde(rename = "type")]
    pub ty: IrType,
    /// Parameter name.
    pub name: String,
    /// Callers must supply a value.
    pub required: bool,
}

/// What a method returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnValue {
    /// Documentation; absent for `void` returns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Return type.
    #[serde(rename = "type")]
    pub ty: IrType,
}

/// Fine-grained variant kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VariantKind {
    /// Blocking, returns every page lazily.
    PagingSync,
    /// Reactive stream of pages.
    PagingAsync,
    /// Reactive single page.
    PagingAsyncSinglePage,
    /// Blocking, one simulated page.
    SimulatedPagingSync,
    /// Reactive, one simulated page.
    SimulatedPagingAsync,
    /// Blocking until the operation completes.
    LongRunningSync,
    /// Callback invoked on completion.
    LongRunningAsyncServiceCallback,
    /// Reactive stream of status updates.
    LongRunningAsync,
    /// Blocking request/response.
    SimpleSync,
    /// Callback invoked with the response.
    SimpleAsyncServiceCallback,
    /// Reactive raw response envelope.
    SimpleAsyncRestResponse,
    /// Reactive response body.
    SimpleAsync,
    /// Reactive re-attach from a persisted handle.
    Resumable,
}

impl VariantKind {
    /// The operation category this kind belongs to.
    pub fn category(self) -> OperationCategory {
        match self {
            VariantKind::PagingSync
            | VariantKind::PagingAsync
            | VariantKind::PagingAsyncSinglePage => OperationCategory::Paging,
            VariantKind::SimulatedPagingSync | VariantKind::SimulatedPagingAsync => {
                OperationCategory::SimulatedPaging
            }
            VariantKind::LongRunningSync
            | VariantKind::LongRunningAsyncServiceCallback
            | VariantKind::LongRunningAsync => OperationCategory::LongRunning,
            VariantKind::SimpleSync
            | VariantKind::SimpleAsyncServiceCallback
            | VariantKind::SimpleAsyncRestResponse
            | VariantKind::SimpleAsync => OperationCategory::Simple,
            VariantKind::Resumable => OperationCategory::Resumable,
        }
    }
}

/// One caller-visible method signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodVariant {
    /// Method name.
    pub name: String,
    /// Documentation.
    pub description: String,
    /// Formal parameters, including a trailing callback where relevant.
    pub parameters: Vec<MethodParameter>,
    /// Return type and documentation.
    pub return_value: ReturnValue,
    /// Variant kind.
    pub kind: VariantKind,
    /// Only required parameters are exposed.
    pub only_required: bool,
    /// Expressions that must be checked for presence before the call.
    pub validation_targets: Vec<String>,
    /// The wire call this variant forwards to.
    #[serde(skip)]
    pub rest_call: Arc<RestCallDescriptor>,
}

/// A fully lowered operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoweredOperation {
    /// Declared operation name.
    pub operation: String,
    /// The wire-level call.
    pub rest_call: Arc<RestCallDescriptor>,
    /// Every caller-visible variant, in emission order.
    pub variants: Arc<[MethodVariant]>,
}
