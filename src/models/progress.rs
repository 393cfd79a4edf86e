use serde::Serialize;

/// Which text input the bot is currently waiting for.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Status {
    None,
    WaitIn,
    InDone,
    WaitOut,
    OutDone,
}

impl Status {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Status::None => "none",
            Status::WaitIn => "wait_in",
            Status::InDone => "in_done",
            Status::WaitOut => "wait_out",
            Status::OutDone => "out_done",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Status::None),
            "wait_in" => Some(Status::WaitIn),
            "in_done" => Some(Status::InDone),
            "wait_out" => Some(Status::WaitOut),
            "out_done" => Some(Status::OutDone),
            _ => None,
        }
    }

    /// True while a 4-digit time entry is expected.
    pub fn is_waiting(&self) -> bool {
        matches!(self, Status::WaitIn | Status::WaitOut)
    }
}

/// Coarse day progress. Only ever moves forward within a date.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Process {
    None,
    SignInDone,
    SignOutDone,
}

impl Process {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Process::None => "none",
            Process::SignInDone => "sign_in_done",
            Process::SignOutDone => "sign_out_done",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Process::None),
            "sign_in_done" => Some(Process::SignInDone),
            "sign_out_done" => Some(Process::SignOutDone),
            _ => None,
        }
    }

    pub fn is_started(&self) -> bool {
        !matches!(self, Process::None)
    }

    /// Whether writing `next` over `self` keeps the day monotonic.
    pub fn can_become(&self, next: Process) -> bool {
        next >= *self
    }
}
