use std::cell::Cell;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::config;

/// Which execution strategy runs lane-wise operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Always run the scalar reference loop.
    Scalar,
    /// Try `std::simd` first and fall back to the scalar loop when it declines.
    PortableSimd,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Scalar, Backend::PortableSimd];

    pub const fn name(self) -> &'static str {
        match self {
            Backend::Scalar => "scalar",
            Backend::PortableSimd => "portable-simd",
        }
    }

    pub fn from_name(name: &str) -> Option<Backend> {
        Backend::ALL.into_iter().find(|b| b.name() == name.trim())
    }
}

impl Default for Backend {
    fn default() -> Self {
        if cfg!(feature = "scalar-only") {
            Backend::Scalar
        } else {
            Backend::PortableSimd
        }
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

thread_local! {
    static OVERRIDE: Cell<Option<Backend>> = const { Cell::new(None) };
}

/// The backend operations on this thread currently run with.
pub fn active_backend() -> Backend {
    OVERRIDE
        .with(Cell::get)
        .unwrap_or_else(|| config::current().backend)
}

struct RestoreOnDrop(Option<Backend>);

impl Drop for RestoreOnDrop {
    fn drop(&mut self) {
        OVERRIDE.with(|cell| cell.set(self.0));
    }
}

/// Runs `f` with `backend` active on the current thread. Nests, and the previous
/// selection is restored even if `f` panics.
pub fn with_backend<R>(backend: Backend, f: impl FnOnce() -> R) -> R {
    let _restore = RestoreOnDrop(OVERRIDE.with(|cell| cell.replace(Some(backend))));
    f()
}

/// Runs `f` once per backend, scalar first.
pub fn compare_backends<R>(f: impl Fn() -> R) -> (R, R) {
    let scalar = with_backend(Backend::Scalar, &f);
    let portable = with_backend(Backend::PortableSimd, &f);
    (scalar, portable)
}
