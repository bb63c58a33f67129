use std::{
    fmt,
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use crate::post::PostId;

/// The navigable views
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Feed,
    Create,
    Edit(PostId),
}

impl FromStr for Route {
    type Err = String;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" => Ok(Self::Feed),
            "/create" => Ok(Self::Create),
            _ => match trimmed.strip_prefix("/edit/") {
                Some(id) if !id.is_empty() && !id.contains('/') => Ok(Self::Edit(id.into())),
                _ => Err(format!("no view at {path}")),
            },
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Feed => write!(f, "/"),
            Self::Create => write!(f, "/create"),
            Self::Edit(id) => write!(f, "/edit/{id}"),
        }
    }
}

/// Liveness of a view.
///
/// Controllers check it after every awaited response and drop the result once
/// the view has been torn down.
#[derive(Debug, Clone)]
pub struct Mount(Arc<AtomicBool>);

impl Default for Mount {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl Mount {
    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.0.store(false, Ordering::Release);
    }
}
