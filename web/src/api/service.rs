use crate::types::{Menu, MenuOption, Reply};
use address_checker::{AssetKind, Dispatcher, Outcome, SessionStore, UserId};

pub fn start_menu() -> Menu {
    Menu {
        prompt: "Select the token you want to check:".into(),
        options: AssetKind::ALL
            .iter()
            .map(|kind| MenuOption {
                label: kind.label().into(),
                data: kind.code().into(),
            })
            .collect(),
    }
}

pub async fn select(sessions: &dyn SessionStore, user: UserId, asset: &str) -> Reply {
    match asset.parse::<AssetKind>() {
        Ok(kind) => {
            sessions.set(user, kind).await;

            Reply {
                ok: true,
                message: format!("Send me the {kind} address for checking."),
            }
        }
        Err(_) => Reply {
            ok: false,
            message: "Unknown token selection.".into(),
        },
    }
}

pub async fn handle_address(
    dispatcher: &Dispatcher,
    sessions: &dyn SessionStore,
    user: UserId,
    text: &str,
) -> Reply {
    let kind = match sessions.get(user).await {
        Some(kind) => kind,
        None => {
            return Reply {
                ok: false,
                message: "Please use /start first and select a token.".into(),
            }
        }
    };

    let address = text.trim();
    log::info!("User {user} requested {kind} check for address: {address}");

    let Outcome { ok, message } = dispatcher.check(kind, address).await;

    Reply {
        ok,
        message: format!("{} {message}", if ok { "✅" } else { "❌" }),
    }
}
