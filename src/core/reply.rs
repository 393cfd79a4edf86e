//! Structural reply kinds. Wording and payload layout live in `ui`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Greeting,
    /// Image carousel introducing the bot.
    Introduction,
    ToFirst,
    /// "Current time" / "Manually enter" for clock-in.
    SignInMenu,
    SignOutMenu,
    AlreadyClockedIn,
    AlreadyClockedOut,
    NotClockedIn,
    InvalidAction,
    /// Yes/No quick reply around a candidate clock-in time.
    ConfirmCheckIn { at: i64 },
    ConfirmCheckOut { at: i64 },
    ManualSignInPrompt,
    ManualSignOutPrompt,
    TimeFormatHint,
    /// Four digits were expected but the text was not a valid time.
    CouldNotUnderstand,
    CheckOutBeforeCheckIn,
    CheckedIn,
    CheckedOut { at: i64, hours: i64, minutes: i64 },
}
