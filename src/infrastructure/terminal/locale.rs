use crate::application::services::validation::ValidationError;
use crate::domain::entities::target::TargetKind;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Ja,
}

impl Locale {
    /// Picks Japanese for `ja*` language tags (`ja_JP.UTF-8`, `ja-JP`...), English otherwise
    pub fn from_language_tag(tag: &str) -> Self {
        if tag.to_lowercase().starts_with("ja") {
            Locale::Ja
        } else {
            Locale::En
        }
    }

    /// `WHILELASTS_LOCALE` when it names a supported locale, then `LANG`
    pub fn detect() -> Self {
        env::var("WHILELASTS_LOCALE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(|| Self::from_language_tag(&env::var("LANG").unwrap_or_default()))
    }

    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::En => &EN,
            Locale::Ja => &JA,
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ja" => Ok(Locale::Ja),
            other => Err(format!("unsupported locale: {other} (use en or ja)")),
        }
    }
}

pub struct TargetMessages {
    pub title: &'static str,
    pub description: &'static str,
}

pub struct UnitMessages {
    pub years: &'static str,
    pub months: &'static str,
    pub weeks: &'static str,
    pub days: &'static str,
    pub hours: &'static str,
    pub minutes: &'static str,
    pub seconds: &'static str,
}

/// Every user-facing string of the terminal host
pub struct Messages {
    pub app_name: &'static str,
    pub view_title: &'static str,
    pub phrases: &'static [&'static str],
    pub time_zone: &'static str,
    /// `{elapsed}` and `{total}` are substituted
    pub progress_format: &'static str,
    pub lifespan: TargetMessages,
    pub next_birthday: TargetMessages,
    pub end_of_year: TargetMessages,
    pub end_of_month: TargetMessages,
    pub reached: &'static str,
    pub units: UnitMessages,
    pub settings_title: &'static str,
    pub settings_saved: &'static str,
    pub settings_not_persisted: &'static str,
    pub share_link: &'static str,
    pub needs_settings: &'static str,
    pub age_error: &'static str,
    pub birthday_error: &'static str,
    pub time_zone_error: &'static str,
    pub version_error: &'static str,
}

impl Messages {
    pub fn target(&self, kind: TargetKind) -> &TargetMessages {
        match kind {
            TargetKind::Lifespan => &self.lifespan,
            TargetKind::NextBirthday => &self.next_birthday,
            TargetKind::EndOfYear => &self.end_of_year,
            TargetKind::EndOfMonth => &self.end_of_month,
        }
    }

    pub fn validation_message(&self, error: &ValidationError) -> &'static str {
        match error {
            ValidationError::UnsupportedVersion(_) => self.version_error,
            ValidationError::AgeOutOfRange(_) => self.age_error,
            ValidationError::InvalidBirthday(_) => self.birthday_error,
            ValidationError::UnknownTimeZone(_) => self.time_zone_error,
        }
    }
}

/// Replaces each `{key}` in `template` with its value
pub fn interpolate(template: &str, values: &[(&str, String)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |text, (key, value)| {
            text.replace(&format!("{{{key}}}"), value)
        })
}

static EN: Messages = Messages {
    app_name: "whilelasts",
    view_title: "Time Remaining",
    phrases: &[
        "There is still time",
        "You decide how to use it",
        "This moment means something",
        "Make your life your own while time remains",
        "Nothing has been decided yet",
        "You are still on the way",
        "What will you do with this time?",
        "There is still room to choose",
        "Live today with care",
        "It is not over yet",
    ],
    time_zone: "Time Zone",
    progress_format: "Remaining {elapsed} / {total}",
    lifespan: TargetMessages {
        title: "Until Lifespan",
        description: "Until {age}th birthday",
    },
    next_birthday: TargetMessages {
        title: "Until Next Birthday",
        description: "Until next birthday",
    },
    end_of_year: TargetMessages {
        title: "Until End of Year",
        description: "Until the end of this year",
    },
    end_of_month: TargetMessages {
        title: "Until End of Month",
        description: "Until the end of this month",
    },
    reached: "Reached",
    units: UnitMessages {
        years: "years",
        months: "months",
        weeks: "weeks",
        days: "days",
        hours: "hours",
        minutes: "minutes",
        seconds: "seconds",
    },
    settings_title: "Settings",
    settings_saved: "Settings saved.",
    settings_not_persisted: "Settings could not be saved on this machine; use the share link instead.",
    share_link: "Share link",
    needs_settings: "No settings found. Run `whilelasts settings --birthday YYYY-MM-DD` first.",
    age_error: "Age must be an integer between 1 and 150",
    birthday_error: "Please enter a valid birthday (YYYY-MM-DD)",
    time_zone_error: "Please select a valid time zone",
    version_error: "Unsupported settings version",
};

static JA: Messages = Messages {
    app_name: "whilelasts",
    view_title: "残り時間",
    phrases: &[
        "まだ時間はある",
        "どう使うか自分で決める",
        "この瞬間には意味がある",
        "残された時があるうちに、人生を自分のものにしよう",
        "まだ何も決まっていない",
        "いまはまだ途中",
        "この時間で、あなたは何をする?",
        "選ぶ余地はまだある",
        "今日を丁寧に生きよう",
        "まだ終わっていない",
    ],
    time_zone: "タイムゾーン",
    progress_format: "{elapsed} / {total}",
    lifespan: TargetMessages {
        title: "寿命まで",
        description: "{age}歳の誕生日まで",
    },
    next_birthday: TargetMessages {
        title: "次の誕生日まで",
        description: "次の誕生日まで",
    },
    end_of_year: TargetMessages {
        title: "今年末まで",
        description: "今年の終わりまで",
    },
    end_of_month: TargetMessages {
        title: "今月末まで",
        description: "今月の終わりまで",
    },
    reached: "到達しました",
    units: UnitMessages {
        years: "年",
        months: "ヶ月",
        weeks: "週",
        days: "日",
        hours: "時間",
        minutes: "分",
        seconds: "秒",
    },
    settings_title: "設定",
    settings_saved: "設定を保存しました。",
    settings_not_persisted: "この環境では設定を保存できませんでした。共有リンクを使ってください。",
    share_link: "共有リンク",
    needs_settings: "設定がありません。先に `whilelasts settings --birthday YYYY-MM-DD` を実行してください。",
    age_error: "年齢は1-150の整数で入力してください",
    birthday_error: "有効な誕生日を入力してください（YYYY-MM-DD）",
    time_zone_error: "有効なタイムゾーンを選択してください",
    version_error: "対応していない設定バージョンです",
};
