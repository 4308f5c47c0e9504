use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct WindowParams {
    pub window: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}
