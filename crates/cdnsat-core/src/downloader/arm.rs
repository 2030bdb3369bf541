//! Build a worker's Easy2 handle and hand it to the multi handle.

use crate::target::Target;

use super::handler::DiscardHandler;
use super::CurlOptions;

/// Configure a reusable Easy2 handle for `target`. The handle keeps its
/// options across requests; re-adding it to the multi issues the same GET.
pub(super) fn configure_easy(
    target: &Target,
    curl: CurlOptions,
) -> Result<curl::easy::Easy2<DiscardHandler>, curl::Error> {
    let mut easy = curl::easy::Easy2::new(DiscardHandler::new());
    easy.url(target.url())?;
    easy.get(true)?;
    easy.useragent(target.user_agent())?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.ssl_verify_peer(curl.verify_tls)?;
    easy.ssl_verify_host(curl.verify_tls)?;
    easy.connect_timeout(curl.connect_timeout)?;
    if let Some(timeout) = curl.timeout {
        easy.timeout(timeout)?;
    }
    if !target.headers().is_empty() {
        let mut list = curl::easy::List::new();
        for line in target.header_lines() {
            list.append(&line)?;
        }
        easy.http_headers(list)?;
    }
    Ok(easy)
}
