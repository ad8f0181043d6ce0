//! OpenAPI document for the public routes, served at `/api-docs/openapi.json`.

use crate::handlers::{account, message};
use crate::model::{Account, Credentials, Message, MessageTextUpdate, NewAccount, NewMessage};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "social-media-api"),
    paths(
        account::register,
        account::login,
        message::create,
        message::list,
        message::read,
        message::delete,
        message::update,
        message::list_by_account,
    ),
    components(schemas(Account, Message, NewAccount, Credentials, NewMessage, MessageTextUpdate)),
    tags(
        (name = "accounts", description = "Registration and login"),
        (name = "messages", description = "Message CRUD")
    )
)]
pub struct ApiDoc;
