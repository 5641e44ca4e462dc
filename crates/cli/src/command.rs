//! Parsing of the driver's line commands.
//!
//! ```text
//! register
//! loot <token> <point-id>
//! attack <token> <target> <head|chest|back>
//! evac <token>
//! show <token>
//! quit
//! ```

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register,
    Loot {
        token: String,
        point: String,
    },
    Attack {
        actor: String,
        target: String,
        part: String,
    },
    Evacuate {
        token: String,
    },
    Show {
        token: String,
    },
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines and `#` comments yield `None`.
    ///
    /// Missing arguments are passed through as empty strings so the runtime
    /// reports them the same way the request layer would.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default().to_lowercase();
        let mut arg = || words.next().unwrap_or_default().to_string();

        let command = match verb.as_str() {
            "register" => Command::Register,
            "loot" => Command::Loot {
                token: arg(),
                point: arg(),
            },
            "attack" => Command::Attack {
                actor: arg(),
                target: arg(),
                part: arg(),
            },
            "evac" | "evacuate" => Command::Evacuate { token: arg() },
            "show" => Command::Show { token: arg() },
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command `{other}`")),
        };
        Ok(Some(command))
    }
}
