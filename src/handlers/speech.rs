//! Canned lines spoken by the skill

use crate::protocol::escape_ssml;

/// The owner's demand, in a low, slow voice
pub const OWNER_DEMAND: &str =
    r#"<prosody pitch="low" rate="90%">契約書だよ。そこに名前を書きな。</prosody>"#;

pub const PAUSE: &str = r#"<break time="1200ms"/>"#;

pub const WELCOME: &str = "ようこそ。このスキルでは、経営者に名前を奪われる主人公の気持ちを味わえます。\
経営者のセリフの後に、あなたの名前を教えてください。では、始めます。";

pub const HELP: &str = "このスキルでは、経営者に名前を奪われる主人公の気持ちを味わえます。\
契約書に名前を書くように言われたら、あなたの名前を教えてください。\
やめるときは、ストップと言ってください。";

pub const RETRY_QUESTION: &str = "もう一度試しますか?";

pub const GOODBYE: &str = "ご利用ありがとうございました。";

pub const UNEXPECTED_REQUEST: &str = "想定外の呼び出しが発生しました。もう一度お試しください。";

pub const APOLOGY: &str = "エラーが発生しました。もう一度お試しください。";

pub const NEW_NAME_CARD_TITLE: &str = "新しい名前";

pub fn launch() -> String {
    format!("{WELCOME}{PAUSE}{OWNER_DEMAND}")
}

pub fn help() -> String {
    format!("{HELP}{PAUSE}{OWNER_DEMAND}")
}

/// The owner renames the user. `new_name` is SSML-ready markup.
pub fn name_stolen(original: &str, new_name: &str) -> String {
    let original = escape_ssml(original);
    format!(
        r#"<prosody pitch="low" rate="90%">フン。{original}というのかい。贅沢な名だねぇ。今からお前の名前は{new_name}だ。いいかい、{new_name}だよ。分かったら返事をするんだ、{new_name}!!</prosody>{PAUSE}あなたの名前は{new_name}になりました。{RETRY_QUESTION}"#
    )
}

/// Card body shown on devices with a screen
pub fn name_card(original: &str, new_name_display: &str) -> String {
    format!("{original} → {new_name_display}")
}
