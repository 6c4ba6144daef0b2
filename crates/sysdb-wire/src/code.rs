//! Frame codes (spec.md §4.2): the command a client sends, or the reply
//! kind a server sends back, all multiplexed over one `code` field.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    Idle,
    Ping,
    Ok,
    Error,
    Log,
    Data,
    Startup,
    Query,
    Fetch,
    List,
    Lookup,
    Store,
    ServerVersion,
    Timeseries,
}

impl Code {
    pub fn as_u32(self) -> u32 {
        match self {
            Code::Idle => 0,
            Code::Ping => 1,
            Code::Ok => 2,
            Code::Error => 3,
            Code::Log => 4,
            Code::Data => 5,
            Code::Startup => 6,
            Code::Query => 7,
            Code::Fetch => 8,
            Code::List => 9,
            Code::Lookup => 10,
            Code::Store => 11,
            Code::ServerVersion => 12,
            Code::Timeseries => 13,
        }
    }

    pub fn from_u32(value: u32) -> Option<Code> {
        Some(match value {
            0 => Code::Idle,
            1 => Code::Ping,
            2 => Code::Ok,
            3 => Code::Error,
            4 => Code::Log,
            5 => Code::Data,
            6 => Code::Startup,
            7 => Code::Query,
            8 => Code::Fetch,
            9 => Code::List,
            10 => Code::Lookup,
            11 => Code::Store,
            12 => Code::ServerVersion,
            13 => Code::Timeseries,
            _ => return None,
        })
    }
}
