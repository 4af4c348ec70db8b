use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::Value;
use tracing::error;

use super::AppState;
use crate::newsletter::mailchimp::{NewsletterError, SubscribeOutcome};
use crate::newsletter::{validate, SignupResponse};

type Reply = (StatusCode, Json<SignupResponse>);

fn reply(status: StatusCode, body: SignupResponse) -> Reply {
    (status, Json(body))
}

/// POST /api/newsletter
pub(crate) async fn subscribe(State(state): State<AppState>, body: Bytes) -> Reply {
    let Ok(input) = serde_json::from_slice::<Value>(&body) else {
        return reply(
            StatusCode::BAD_REQUEST,
            SignupResponse::error("Invalid request format"),
        );
    };
    let signup = match validate(&input) {
        Ok(signup) => signup,
        Err(message) => return reply(StatusCode::BAD_REQUEST, SignupResponse::error(message)),
    };

    match state.mailchimp.subscribe(&signup).await {
        Ok(SubscribeOutcome::Subscribed) => reply(
            StatusCode::OK,
            SignupResponse::success(
                "Thanks for subscribing! Please check your email to confirm your subscription.",
            ),
        ),
        Ok(SubscribeOutcome::AlreadySubscribed) => reply(
            StatusCode::CONFLICT,
            SignupResponse::error("This email is already subscribed to our newsletter."),
        ),
        Ok(SubscribeOutcome::Unavailable) => reply(
            StatusCode::BAD_GATEWAY,
            SignupResponse::error(
                "Newsletter service is temporarily unavailable. Please try again later.",
            ),
        ),
        Ok(SubscribeOutcome::Rejected(detail)) => reply(
            StatusCode::BAD_REQUEST,
            SignupResponse::error(detail.unwrap_or_else(|| {
                "Unable to subscribe. Please check your email and try again.".to_string()
            })),
        ),
        Err(e @ NewsletterError::NotConfigured { .. }) => {
            error!(error = %e, "newsletter signup misconfigured");
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                SignupResponse::error("Server configuration error. Please contact support."),
            )
        }
        Err(e @ NewsletterError::Transport(_)) => {
            error!(error = %e, "newsletter provider unreachable");
            reply(
                StatusCode::BAD_GATEWAY,
                SignupResponse::error(
                    "Unable to connect to newsletter service. Please try again later.",
                ),
            )
        }
    }
}
