//! Message codes.

/// Known Cluck message codes.
///
/// Codes outside this table are legal on the wire; [`MessageCode::try_from`]
/// hands the raw value back so the caller can decide what to do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MessageCode {
    /// Message-of-the-day text (server → client).
    Motd = 1,
    /// Request for the message of the day.
    MotdRequest = 2,
    /// Command succeeded; payload is a human-readable confirmation.
    CommandSuccess = 10,
    /// Command failed; payload is a human-readable reason.
    CommandError = 11,
    /// Register a username on this connection.
    RegisterUser = 100,
    /// Username registered on this connection.
    UserStatus = 101,
    /// Ask which username is registered on this connection.
    Whoami = 110,
}

impl MessageCode {
    /// All known codes in wire order.
    pub const ALL: [MessageCode; 7] = [
        Self::Motd,
        Self::MotdRequest,
        Self::CommandSuccess,
        Self::CommandError,
        Self::RegisterUser,
        Self::UserStatus,
        Self::Whoami,
    ];

    /// Returns the wire value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns the lower-case protocol name of the code.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Motd => "motd",
            Self::MotdRequest => "motd_request",
            Self::CommandSuccess => "command_success",
            Self::CommandError => "command_error",
            Self::RegisterUser => "register_user",
            Self::UserStatus => "user_status",
            Self::Whoami => "whoami",
        }
    }
}

impl TryFrom<u16> for MessageCode {
    type Error = u16;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Motd),
            2 => Ok(Self::MotdRequest),
            10 => Ok(Self::CommandSuccess),
            11 => Ok(Self::CommandError),
            100 => Ok(Self::RegisterUser),
            101 => Ok(Self::UserStatus),
            110 => Ok(Self::Whoami),
            other => Err(other),
        }
    }
}

impl From<MessageCode> for u16 {
    fn from(code: MessageCode) -> Self {
        code.as_u16()
    }
}

impl std::fmt::Display for MessageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name(), self.as_u16())
    }
}
