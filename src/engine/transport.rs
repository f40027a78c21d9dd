use backon::{ExponentialBuilder, Retryable};
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

const UPSTREAM_BODY_PREVIEW_CHARS: usize = 512;

static NETWORK_RETRY_POLICY: LazyLock<ExponentialBuilder> = LazyLock::new(|| {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(100))
        .with_max_delay(Duration::from_millis(300))
        .with_max_times(2)
        .with_jitter()
});

/// POSTs a JSON body, retrying transport errors and upstream 5xx a bounded
/// number of times.
pub(crate) async fn post_json_with_retry<T>(
    engine: &'static str,
    client: &reqwest::Client,
    url: &Url,
    body: &T,
) -> Result<reqwest::Response, reqwest::Error>
where
    T: serde::Serialize,
{
    (|| {
        let client = client.clone();
        let url = url.clone();

        async move {
            let resp = client.post(url.clone()).json(body).send().await?;

            if resp.status().is_server_error() {
                let status = resp.status();
                let err = resp.error_for_status_ref().unwrap_err();

                let body_preview = match resp.bytes().await {
                    Ok(bytes) => {
                        let raw_body = String::from_utf8_lossy(&bytes);
                        format!("{:.len$}", raw_body, len = UPSTREAM_BODY_PREVIEW_CHARS)
                    }
                    Err(e) => format!("<failed to read body: {e}>"),
                };

                tracing::debug!(
                    engine,
                    %status,
                    url = %url,
                    body = %body_preview,
                    "[{engine}] Upstream server error (will retry)"
                );

                return Err(err);
            }

            Ok(resp)
        }
    })
    .retry(*NETWORK_RETRY_POLICY)
    .await
}
