//! Management API 备份导出

use std::io;
use std::sync::Arc;

use actix_web::body::SizedStream;
use actix_web::{HttpResponse, web};
use bytes::{Bytes, BytesMut};
use futures_util::Stream;
use tempfile::NamedTempFile;
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::services::LinkService;

use super::error::ApiError;
use super::helpers::run_blocking;

/// Attachment name offered to the client.
pub const BACKUP_FILENAME: &str = "backup.db";

const CHUNK_SIZE: usize = 64 * 1024;

/// `GET /backup` → binary store image
///
/// The image is streamed from its scratch file in chunks; `Content-Length`
/// is the snapshot size.
pub async fn download_backup(
    service: web::Data<Arc<LinkService>>,
) -> Result<HttpResponse, ApiError> {
    let service = service.get_ref().clone();
    let snapshot = run_blocking(move || service.backup()).await?;

    info!(
        "Backup exported: {} records, {} bytes",
        snapshot.records,
        snapshot.len()
    );

    let len = snapshot.len();
    let stream = file_stream(snapshot.into_file()).map_err(ApiError::internal)?;

    Ok(HttpResponse::Ok()
        .content_type("application/octet-stream")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", BACKUP_FILENAME),
        ))
        .body(SizedStream::new(len, stream)))
}

/// Chunked reader over `file`. The temp file lives as long as the stream,
/// so it is deleted once the response is done.
fn file_stream(file: NamedTempFile) -> io::Result<impl Stream<Item = io::Result<Bytes>>> {
    let reader = tokio::fs::File::from_std(file.reopen()?);
    Ok(futures_util::stream::try_unfold((reader, file), next_chunk))
}

async fn next_chunk(
    (mut reader, file): (tokio::fs::File, NamedTempFile),
) -> io::Result<Option<(Bytes, (tokio::fs::File, NamedTempFile))>> {
    let mut buf = BytesMut::with_capacity(CHUNK_SIZE);
    if reader.read_buf(&mut buf).await? == 0 {
        return Ok(None);
    }
    Ok(Some((buf.freeze(), (reader, file))))
}
