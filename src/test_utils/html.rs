use axum::{body::Body, response::Response};
use scraper::{Html, Selector};

async fn response_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8_lossy(&body).to_string()
}

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    Html::parse_document(&response_text(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    Html::parse_fragment(&response_text(response).await)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// Assert that `html` holds an alert of `kind` ("success" or "error") whose text
/// contains `message` and `details`.
#[track_caller]
pub(crate) fn assert_alert(html: &Html, kind: &str, message: &str, details: &str) {
    let alert = html
        .select(&Selector::parse("[role=alert]").unwrap())
        .next()
        .expect("No alert found");

    assert_eq!(
        alert.value().attr("data-alert-kind"),
        Some(kind),
        "want a {kind} alert"
    );

    let text = alert.text().collect::<String>();
    assert!(
        text.contains(message),
        "want alert message {message:?}, got {text:?}"
    );
    assert!(
        text.contains(details),
        "want alert details {details:?}, got {text:?}"
    );
}
