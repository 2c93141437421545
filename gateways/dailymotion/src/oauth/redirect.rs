//! Loopback endpoint that receives the OAuth redirect.

use eyre::{Context, eyre};
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use oauth2::{AuthorizationCode, CsrfToken, RedirectUrl};
use std::convert::Infallible;
use std::future::Future;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};

const GRANTED_HTML: &str = "<!doctype html><title>Dailymotion</title>\
    <p>Access to Dailymotion was granted. You can close this window.</p>";
const DENIED_HTML: &str = "<!doctype html><title>Dailymotion</title>\
    <p>Access to Dailymotion was denied. You can close this window.</p>";

/// What a request to the redirect endpoint amounts to.
#[derive(Debug, PartialEq)]
enum Callback {
    Granted(String),
    Denied(String),
    /// Looks like a callback, but cannot be trusted or used.
    Invalid(&'static str),
    /// Anything else the browser asks for, like `/favicon.ico`.
    Unrelated,
}

fn classify(query: &str, csrf: &CsrfToken) -> Callback {
    let mut state = None;
    let mut code = None;
    let mut error = None;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match &*key {
            "state" => state = Some(value.into_owned()),
            "code" => code = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if state.is_none() && code.is_none() && error.is_none() {
        return Callback::Unrelated;
    }
    if state.as_deref() != Some(csrf.secret().as_str()) {
        return Callback::Invalid("state does not match this authorization request");
    }
    match (code, error) {
        (_, Some(error)) => Callback::Denied(error),
        (Some(code), None) => Callback::Granted(code),
        (None, None) => Callback::Invalid("no authorization code found"),
    }
}

fn page(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = status;
    response
}

/// Starts listening on a random loopback port.
///
/// Returns the redirect URL to register with the authorization request, and a future that
/// resolves once the browser has been redirected back with a code carrying the expected
/// `state`.
pub(super) async fn listen(
    csrf: CsrfToken,
) -> eyre::Result<(
    RedirectUrl,
    impl Future<Output = eyre::Result<AuthorizationCode>>,
)> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind to localhost")?;
    let addr = listener.local_addr().context("get local address")?;
    let url = RedirectUrl::new(format!("http://{addr}/")).context("construct redirect url")?;

    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = tx.send(accept_until_callback(listener, csrf).await);
    });

    Ok((url, async move {
        rx.await.context("redirect listener exited prematurely")?
    }))
}

async fn accept_until_callback(
    listener: TcpListener,
    csrf: CsrfToken,
) -> eyre::Result<AuthorizationCode> {
    let (outcome_tx, mut outcome_rx) = mpsc::channel(1);
    loop {
        let conn = tokio::select! {
            accepted = listener.accept() => accepted.context("accept redirect connection")?.0,
            outcome = outcome_rx.recv() => {
                return match outcome {
                    Some(Ok(code)) => Ok(AuthorizationCode::new(code)),
                    Some(Err(error)) => Err(eyre!("user did not grant access: {error}")),
                    None => Err(eyre!("redirect endpoint stopped")),
                };
            }
        };

        let csrf = csrf.clone();
        let outcome_tx = outcome_tx.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let callback = classify(req.uri().query().unwrap_or(""), &csrf);
                let outcome_tx = outcome_tx.clone();
                async move {
                    let response = match callback {
                        Callback::Granted(code) => {
                            let _ = outcome_tx.send(Ok(code)).await;
                            page(StatusCode::OK, GRANTED_HTML)
                        }
                        Callback::Denied(error) => {
                            let _ = outcome_tx.send(Err(error)).await;
                            page(StatusCode::OK, DENIED_HTML)
                        }
                        Callback::Invalid(reason) => {
                            tracing::warn!(reason, "rejected OAuth redirect");
                            page(StatusCode::BAD_REQUEST, reason)
                        }
                        Callback::Unrelated => page(StatusCode::NOT_FOUND, ""),
                    };
                    Ok::<_, Infallible>(response)
                }
            });
            if let Err(e) = http1::Builder::new()
                .serve_connection(TokioIo::new(conn), service)
                .await
            {
                tracing::debug!(error = %e, "redirect connection ended with error");
            }
        });
    }
}
