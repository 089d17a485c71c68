use axum::extract::multipart::Field;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use tubely_core::AppError;

use crate::error::multipart_error;
use crate::services::upload::UploadKind;

pub(crate) fn is_file_field(field: &Field<'_>, kind: UploadKind) -> bool {
    field.name() == Some(kind.field_name())
}

pub(crate) fn missing_field(kind: UploadKind) -> AppError {
    AppError::BadRequest(format!(
        "Missing multipart field '{}'",
        kind.field_name()
    ))
}

/// Body of a multipart field as a stream of chunks; read errors keep their 413/400 meaning.
pub(crate) fn field_body<'a>(field: Field<'a>) -> BoxStream<'a, Result<Bytes, AppError>> {
    field.map_err(multipart_error).boxed()
}
