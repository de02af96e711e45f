use serde::{Deserialize, Serialize};

use crate::contract::{Info, NewInfo};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoDto {
    pub id: i64,
    pub name: String,
}

impl From<Info> for InfoDto {
    fn from(info: Info) -> Self {
        Self {
            id: info.id,
            name: info.name,
        }
    }
}

/// Body of `POST /infos`; without an id the store assigns one
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveInfoRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
}

impl From<SaveInfoRequest> for NewInfo {
    fn from(req: SaveInfoRequest) -> Self {
        Self {
            id: req.id,
            name: req.name,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListInfoQuery {
    pub name: Option<String>,
}
