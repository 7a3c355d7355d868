// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Command parsing for the interactive driver.

/// A user action entered at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login {
        provider: String,
        email: Option<String>,
    },
    Logout,
    Address,
    ChainId,
    Balance,
    Faucet,
    Send {
        recipient: String,
        amount: f64,
    },
    Sign {
        message: Option<String>,
    },
    User,
    Wallet,
    RequestSignature,
    Console,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid amount `{0}`")]
    InvalidAmount(String),
}

pub const HELP: &str = "\
commands:
  login <provider> [email]   log in (email_passwordless needs an email)
  logout                     log out
  address                    derive and show the wallet address
  chain-id                   query the node's chain identifier
  balance                    show the SUI balance
  faucet                     request test SUI (devnet/testnet only)
  send <recipient> <amount>  transfer SUI
  sign [message]             sign a message
  user                       show the logged-in user
  wallet                     open wallet services
  request-signature          sign \"Hello World\" through the identity SDK
  console                    print the console log
  help                       show this help
  quit                       exit";

/// Parse one input line.
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match name.to_ascii_lowercase().as_str() {
        "" => return Err(ParseError::Empty),
        "login" => match args.as_slice() {
            [provider] => Command::Login {
                provider: provider.to_string(),
                email: None,
            },
            [provider, email] => Command::Login {
                provider: provider.to_string(),
                email: Some(email.to_string()),
            },
            _ => return Err(ParseError::Usage("login <provider> [email]")),
        },
        "logout" => Command::Logout,
        "address" => Command::Address,
        "chain-id" | "chainid" => Command::ChainId,
        "balance" => Command::Balance,
        "faucet" => Command::Faucet,
        "send" => match args.as_slice() {
            [recipient, amount] => Command::Send {
                recipient: recipient.to_string(),
                amount: amount
                    .parse()
                    .map_err(|_| ParseError::InvalidAmount(amount.to_string()))?,
            },
            _ => return Err(ParseError::Usage("send <recipient> <amount>")),
        },
        "sign" => Command::Sign {
            message: (!rest.is_empty()).then(|| rest.to_string()),
        },
        "user" => Command::User,
        "wallet" => Command::Wallet,
        "request-signature" => Command::RequestSignature,
        "console" => Command::Console,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(command)
}
