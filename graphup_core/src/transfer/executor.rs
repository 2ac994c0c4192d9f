use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Url};
use tokio::sync::mpsc;
use tokio_util::io::ReaderStream;

use crate::account::AccountProvider;
use crate::config::GraphConfig;
use crate::error::GraphError;
use crate::events::EventBus;
use crate::transfer::sampler::ProgressSampler;
use crate::types::{ObjectKind, Param, ParamValue, TransferKind, TransferResponse, TransferStatus};

/// Name of the auth parameter prepended to every request.
const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Performs exactly one HTTP exchange per `execute` call and reports its
/// lifecycle on the caller's `EventBus`.
///
/// Holds no per-transfer state: the HTTP client and account provider are the
/// only fields, and both are shared across calls.
pub struct TransferExecutor {
    client: Client,
    account: Arc<dyn AccountProvider>,
}

impl TransferExecutor {
    pub fn new(config: &GraphConfig, account: Arc<dyn AccountProvider>) -> Result<Self, GraphError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self::with_client(client, account))
    }

    pub fn with_client(client: Client, account: Arc<dyn AccountProvider>) -> Self {
        Self { client, account }
    }

    /// Run one transfer.
    ///
    /// `Upload` sends a multipart POST, `Download` a GET with the parameters
    /// in the query string. The access token is always the first parameter.
    /// The returned status is handed back whatever it is; on anything other
    /// than HTTP 200 a `transfer-failed` event has already been emitted.
    pub async fn execute(
        &self,
        url: &str,
        params: Vec<Param>,
        kind: TransferKind,
        object: ObjectKind,
        bus: &EventBus,
    ) -> TransferResponse {
        let mut all = Vec::with_capacity(params.len() + 1);
        all.push(Param::text(ACCESS_TOKEN_PARAM, self.account.access_token()));
        all.extend(params);

        let mut sampler = ProgressSampler::new(bus, object, kind);
        let response = match kind {
            TransferKind::Upload => self.post_multipart(url, all, &mut sampler).await,
            TransferKind::Download => self.get(url, all, &mut sampler).await,
        };

        if response.status.is_ok() {
            sampler.complete();
        } else {
            let reason = response.status.failure_reason();
            log::debug!("[transfer] {} {} failed: {}", kind, url, reason);
            sampler.fail(&reason);
        }
        response
    }

    async fn get(
        &self,
        url: &str,
        params: Vec<Param>,
        sampler: &mut ProgressSampler<'_>,
    ) -> TransferResponse {
        let mut url = match parse_url(url) {
            Ok(url) => url,
            Err(failed) => return failed,
        };
        {
            let mut query = url.query_pairs_mut();
            for param in params {
                match param.value {
                    ParamValue::Text(value) => {
                        query.append_pair(&param.name, &value);
                    }
                    ParamValue::File(path) => {
                        log::warn!(
                            "[transfer] file parameter {} on a GET request, sending its path",
                            param.name
                        );
                        query.append_pair(&param.name, &path.to_string_lossy());
                    }
                }
            }
        }
        log::debug!("[transfer] GET {}{}", url.origin().ascii_serialization(), url.path());

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return TransferResponse::empty(TransferStatus::Network(e.to_string())),
        };

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
            return TransferResponse {
                status: TransferStatus::Http(status),
                body,
            };
        }

        let total = response.content_length().unwrap_or(0);
        sampler.sample(total, 0, 0, 0);

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(chunk) => {
                    body.extend_from_slice(&chunk);
                    sampler.sample(total, body.len() as u64, 0, 0);
                }
                Err(e) => {
                    log::debug!(
                        "[transfer] download interrupted after {} bytes: {}",
                        body.len(), e
                    );
                    return TransferResponse {
                        status: TransferStatus::Network(e.to_string()),
                        body,
                    };
                }
            }
        }

        TransferResponse {
            status: TransferStatus::Http(status),
            body,
        }
    }

    /// Multipart POST. File parts are streamed from disk; every chunk read
    /// reports the cumulative byte offset back over a channel that this task
    /// drains while the request is in flight, so events are emitted here
    /// rather than on the connection task.
    async fn post_multipart(
        &self,
        url: &str,
        params: Vec<Param>,
        sampler: &mut ProgressSampler<'_>,
    ) -> TransferResponse {
        let url = match parse_url(url) {
            Ok(url) => url,
            Err(failed) => return failed,
        };

        let mut sizes = Vec::with_capacity(params.len());
        for param in &params {
            let size = match &param.value {
                ParamValue::Text(value) => value.len() as u64,
                ParamValue::File(path) => match tokio::fs::metadata(path).await {
                    Ok(meta) => meta.len(),
                    Err(e) => return file_failure(path, e),
                },
            };
            sizes.push(size);
        }
        let total: u64 = sizes.iter().sum();

        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<u64>();
        let mut form = Form::new();
        let mut offset = 0u64;
        for (param, size) in params.into_iter().zip(sizes) {
            form = match param.value {
                ParamValue::Text(value) => form.text(param.name, value),
                ParamValue::File(path) => {
                    let file = match tokio::fs::File::open(&path).await {
                        Ok(file) => file,
                        Err(e) => return file_failure(&path, e),
                    };
                    let part = file_part(file, &path, size, offset, progress_tx.clone());
                    form.part(param.name, part)
                }
            };
            offset += size;
        }
        // Only the file streams hold senders now; the channel closes with them.
        drop(progress_tx);

        log::debug!("[transfer] POST {} ({} bytes of parameters)", url, total);
        sampler.sample(0, 0, total, 0);

        let send = self.client.post(url).multipart(form).send();
        tokio::pin!(send);
        let result = loop {
            tokio::select! {
                biased;
                Some(done) = progress_rx.recv() => {
                    // The final sample is reported via `complete` once the
                    // server has accepted the body.
                    if done < total {
                        sampler.sample(0, 0, total, done);
                    }
                }
                result = &mut send => break result,
            }
        };
        while let Ok(done) = progress_rx.try_recv() {
            if done < total {
                sampler.sample(0, 0, total, done);
            }
        }

        let response = match result {
            Ok(response) => response,
            Err(e) => return TransferResponse::empty(TransferStatus::Network(e.to_string())),
        };

        let status = response.status().as_u16();
        match response.bytes().await {
            Ok(body) => TransferResponse {
                status: TransferStatus::Http(status),
                body: body.to_vec(),
            },
            Err(e) if status == 200 => TransferResponse::empty(TransferStatus::Network(e.to_string())),
            Err(_) => TransferResponse::empty(TransferStatus::Http(status)),
        }
    }
}

impl TransferResponse {
    fn empty(status: TransferStatus) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }
}

fn parse_url(url: &str) -> Result<Url, TransferResponse> {
    Url::parse(url).map_err(|e| {
        log::warn!("[transfer] refusing to send to {}: {}", url, e);
        TransferResponse::empty(TransferStatus::InvalidUrl(format!("{}: {}", url, e)))
    })
}

fn file_failure(path: &Path, e: std::io::Error) -> TransferResponse {
    log::warn!("[transfer] cannot read {}: {}", path.display(), e);
    TransferResponse::empty(TransferStatus::File(format!("{}: {}", path.display(), e)))
}

/// Streams `file` as a multipart part, reporting `offset + bytes_read` after
/// each chunk.
fn file_part(
    file: tokio::fs::File,
    path: &Path,
    size: u64,
    offset: u64,
    progress: mpsc::UnboundedSender<u64>,
) -> Part {
    let mut sent = 0u64;
    let stream = ReaderStream::new(file).map(move |chunk| {
        if let Ok(bytes) = &chunk {
            sent += bytes.len() as u64;
            let _ = progress.send(offset + sent);
        }
        chunk
    });

    let part = Part::stream_with_length(Body::wrap_stream(stream), size);
    match path.file_name() {
        Some(name) => part.file_name(name.to_string_lossy().into_owned()),
        None => part,
    }
}
