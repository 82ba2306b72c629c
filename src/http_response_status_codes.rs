/// The status codes the spass handlers respond with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpResponseStatusCode {
    OK200,
    NotFound404,
    MethodNotAllowed405,
    InternalServerError500,
}

impl HttpResponseStatusCode {
    pub fn code(self) -> u16 {
        match self {
            HttpResponseStatusCode::OK200 => 200,
            HttpResponseStatusCode::NotFound404 => 404,
            HttpResponseStatusCode::MethodNotAllowed405 => 405,
            HttpResponseStatusCode::InternalServerError500 => 500,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            HttpResponseStatusCode::OK200 => "OK",
            HttpResponseStatusCode::NotFound404 => "Not Found",
            HttpResponseStatusCode::MethodNotAllowed405 => "Method Not Allowed",
            HttpResponseStatusCode::InternalServerError500 => "Internal Server Error",
        }
    }

    pub fn desc(self) -> &'static str {
        match self {
            HttpResponseStatusCode::OK200 => "The request succeeded.",
            HttpResponseStatusCode::NotFound404 => "The requested page does not exist.",
            HttpResponseStatusCode::MethodNotAllowed405 =>
                "The request method is not supported for this page.",
            HttpResponseStatusCode::InternalServerError500 =>
                "The server encountered an error while handling the request.",
        }
    }
}
