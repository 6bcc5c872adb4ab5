use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Methods the server can route. Matching is case-sensitive: `get` is not `GET`.
#[derive(EnumString, IntoStaticStr, Display, EnumIter, Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum HttpMethod {
    #[strum(serialize = "GET")]
    Get,
    #[strum(serialize = "POST")]
    Post,
    #[strum(serialize = "PUT")]
    Put,
    #[strum(serialize = "DELETE")]
    Delete,
    #[strum(serialize = "PATCH")]
    Patch,
}
