use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use crate::countdown::{CountdownView, Phase};
use crate::predict::PassEvent;

#[derive(OpenApi)]
#[openapi(
    paths(super::api::countdown::countdown, super::api::pass::next_pass),
    components(schemas(CountdownView, Phase, PassEvent, ErrorResponse)),
    info(
        title = "Pass Countdown API",
        description = "Live countdown to the next overhead pass",
        version = "0.1.0"
    ),
    tags(
        (name = "countdown", description = "Countdown and pass prediction")
    )
)]
pub struct ApiDoc;
