//! Absolute URLs derived from the incoming request.

use actix_web::HttpRequest;
use url::Url;

use crate::domain::{Error, MediaPath, RecipeId};

/// `<scheme>://<host>` as seen by the client.
pub(crate) fn origin(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}", info.scheme(), info.host())
}

/// Full URL of the current request, query string included.
pub(crate) fn request_url(req: &HttpRequest) -> Result<Url, Error> {
    let raw = format!("{}{}", origin(req), req.uri());
    Url::parse(&raw).map_err(|err| Error::internal(format!("request URL is invalid: {err}")))
}

/// Public URL for a stored media file. `media_url` may be a path prefix such
/// as `/media/` or already carry a scheme and host.
pub(crate) fn media_url(req: &HttpRequest, media_url: &str, path: &MediaPath) -> String {
    if media_url.starts_with("http://") || media_url.starts_with("https://") {
        format!("{media_url}{path}")
    } else {
        format!("{}{media_url}{path}", origin(req))
    }
}

/// Front-end link to a recipe page.
pub(crate) fn recipe_link(req: &HttpRequest, id: RecipeId) -> String {
    format!("{}/recipes/{id}/", origin(req))
}
