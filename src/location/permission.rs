// src/location/permission.rs
//! Location access authorization
//!
//! Tracking can only start with a [`LocationGrant`], and the only way to get
//! one is through [`authorize`].

use crate::error::{Result, TrackerError};
use std::io::{BufRead, Write};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

impl Permission {
    pub fn is_granted(&self) -> bool {
        *self == Permission::Granted
    }
}

/// Platform-specific location permission checks
pub trait Authorization {
    /// Current permission state, without prompting
    fn check(&self) -> Permission;

    /// Ask the user for permission
    fn request(&mut self) -> Permission;
}

/// Proof that location access was granted
#[derive(Debug)]
pub struct LocationGrant {
    _private: (),
}

/// Check for permission, requesting it when not yet granted
pub fn authorize(auth: &mut dyn Authorization) -> Result<LocationGrant> {
    let mut status = auth.check();
    if !status.is_granted() {
        status = auth.request();
    }

    if status.is_granted() {
        Ok(LocationGrant { _private: () })
    } else {
        warn!("location permission not granted");
        Err(TrackerError::PermissionDenied)
    }
}

/// Fixed answer, for hosts that manage permissions elsewhere
#[derive(Debug, Clone, Copy)]
pub struct StaticAuthorization(pub Permission);

impl StaticAuthorization {
    pub fn granted() -> Self {
        Self(Permission::Granted)
    }

    pub fn denied() -> Self {
        Self(Permission::Denied)
    }
}

impl Authorization for StaticAuthorization {
    fn check(&self) -> Permission {
        self.0
    }

    fn request(&mut self) -> Permission {
        self.0
    }
}

/// Stored consent, asking on the terminal when none has been given yet
pub struct ConsentAuthorization<R, W> {
    consent: Option<bool>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsentAuthorization<R, W> {
    pub fn new(consent: Option<bool>, input: R, output: W) -> Self {
        Self { consent, input, output }
    }

    /// The consent after any prompt, for saving back to config
    pub fn consent(&self) -> Option<bool> {
        self.consent
    }

    fn prompt(&mut self) -> std::io::Result<bool> {
        write!(
            self.output,
            "Allow workout-tracker to access your location while tracking? [y/N] "
        )?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}

impl<R: BufRead, W: Write> Authorization for ConsentAuthorization<R, W> {
    fn check(&self) -> Permission {
        match self.consent {
            Some(true) => Permission::Granted,
            _ => Permission::Denied,
        }
    }

    fn request(&mut self) -> Permission {
        let allowed = match self.prompt() {
            Ok(allowed) => allowed,
            Err(e) => {
                warn!("could not prompt for location permission: {}", e);
                false
            }
        };
        self.consent = Some(allowed);
        if allowed {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }
}
