//! Localised message tables (en / ja / ko).
//!
//! Templates use `{date}`, `{hours}`, `{minutes}` and `{account}` placeholders,
//! filled in by `compose`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    Ja,
    Ko,
}

impl Lang {
    pub const ALL: [Lang; 3] = [Lang::En, Lang::Ja, Lang::Ko];

    /// Locale code the messaging platform expects in `i18n*` arrays.
    pub fn locale(&self) -> &'static str {
        match self {
            Lang::En => "en_US",
            Lang::Ja => "ja_JP",
            Lang::Ko => "ko_KR",
        }
    }

    /// Accepts `en`, `ja`, `ko` and the full locale codes.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "en" | "en_us" => Some(Lang::En),
            "ja" | "ja_jp" => Some(Lang::Ja),
            "ko" | "ko_kr" => Some(Lang::Ko),
            _ => None,
        }
    }

    /// strftime pattern for a full timestamp in confirmations.
    pub fn date_time_format(&self) -> &'static str {
        match self {
            Lang::En => "%A, %B %-d at %-I:%M %P",
            Lang::Ja => "%-m月%-d日 %H:%M",
            Lang::Ko => "%-m월 %-d일 %H:%M",
        }
    }

    /// strftime pattern for a day in summaries and calendar titles.
    pub fn date_format(&self) -> &'static str {
        match self {
            Lang::En => "%A, %B %d",
            Lang::Ja => "%-m月%-d日",
            Lang::Ko => "%-m월 %-d일",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    Greeting,
    TryNow,
    ToFirst,
    SignInMenu,
    SignOutMenu,
    CurrentTime,
    ManuallyEnter,
    Yes,
    No,
    AlreadyClockedIn,
    AlreadyClockedOut,
    NotClockedIn,
    InvalidAction,
    ConfirmCheckIn,
    ConfirmCheckOut,
    ManualSignInPrompt,
    ManualSignOutPrompt,
    TimeFormatHint,
    CouldNotUnderstand,
    CheckOutBeforeCheckIn,
    CheckedIn,
    CheckedOut,
    CheckedOutMinutes,
    RecordClockIn,
    RecordClockOut,
    StartOver,
    CheckInTitle,
    WorkingHoursTitle,
}

pub fn template(msg: Msg, lang: Lang) -> &'static str {
    match lang {
        Lang::En => en(msg),
        Lang::Ja => ja(msg),
        Lang::Ko => ko(msg),
    }
}

fn en(msg: Msg) -> &'static str {
    match msg {
        Msg::Greeting => {
            "Hello, I'm an attendance management bot of WORKS that helps your timeclock management and entry."
        }
        Msg::TryNow => "Try now",
        Msg::ToFirst => {
            "Please select \"Record\" on the bottom of the menu each time when you clock in and clock out."
        }
        Msg::SignInMenu => "Please select the clock-in time entry method.",
        Msg::SignOutMenu => "Please select the clock-out time entry method.",
        Msg::CurrentTime => "Current time",
        Msg::ManuallyEnter => "Manually enter",
        Msg::Yes => "Yes",
        Msg::No => "No",
        Msg::AlreadyClockedIn => {
            "There is already a clock-in time. Please select \"Record\" on the bottom of the menu when you clock out."
        }
        Msg::AlreadyClockedOut => {
            "There is already a clock-out time. Please select \"Record\" on the bottom of the menu when you clock in."
        }
        Msg::NotClockedIn => {
            "Today's clock-in time has not been registered. Please select \"Record clock-in\" on the bottom of the menu, and enter your clock-in time."
        }
        Msg::InvalidAction => {
            "The text could not be understood. Please select the appropriate \"Record\" button on the bottom of the menu when you clock in or clock out."
        }
        Msg::ConfirmCheckIn => "Register the current time {date} as clock-in time?",
        Msg::ConfirmCheckOut => "Register the current time {date} as clock-out time?",
        Msg::ManualSignInPrompt => "Please manually enter the clock-in time.",
        Msg::ManualSignOutPrompt => "Please manually enter the clock-out time.",
        Msg::TimeFormatHint => {
            "Please use the military time format with a total of 4 numerical digits (hhmm) when entering the time. For example, type 2020 to indicate 8:20 PM."
        }
        Msg::CouldNotUnderstand => {
            "Sorry, but unable to comprehend your composed time. Please check the time entry method again, and enter the time."
        }
        Msg::CheckOutBeforeCheckIn => {
            "Clock-out time was recorded as being earlier than the time of clock-in. Please check the clock-out time again and re-enter it."
        }
        Msg::CheckedIn => "Clock-in time has been registered.",
        Msg::CheckedOut => {
            "Clock-out time has been registered. The total working hours for {date} is {hours} hours and {minutes} minutes."
        }
        Msg::CheckedOutMinutes => {
            "Clock-out time has been registered. The total working hours for {date} is {minutes} minutes."
        }
        Msg::RecordClockIn => "Record clock-in",
        Msg::RecordClockOut => "Record clock-out",
        Msg::StartOver => "Start over",
        Msg::CheckInTitle => "{account}'s clock-in time on {date}",
        Msg::WorkingHoursTitle => "{account}'s working hours on {date}",
    }
}

fn ja(msg: Msg) -> &'static str {
    match msg {
        Msg::Greeting => {
            "こんにちは、WORKSの勤怠管理ボットです。出退勤時刻の記録と管理をお手伝いします。"
        }
        Msg::TryNow => "試してみる",
        Msg::ToFirst => "出勤時と退勤時には、メニュー下部の「記録」を選択してください。",
        Msg::SignInMenu => "出勤時刻の入力方法を選択してください。",
        Msg::SignOutMenu => "退勤時刻の入力方法を選択してください。",
        Msg::CurrentTime => "現在時刻",
        Msg::ManuallyEnter => "手動で入力",
        Msg::Yes => "はい",
        Msg::No => "いいえ",
        Msg::AlreadyClockedIn => {
            "出勤時刻はすでに登録されています。退勤時にメニュー下部の「記録」を選択してください。"
        }
        Msg::AlreadyClockedOut => {
            "退勤時刻はすでに登録されています。出勤時にメニュー下部の「記録」を選択してください。"
        }
        Msg::NotClockedIn => {
            "本日の出勤時刻が登録されていません。メニュー下部の「出勤を記録」を選択し、出勤時刻を入力してください。"
        }
        Msg::InvalidAction => {
            "入力内容を理解できませんでした。出勤時または退勤時に、メニュー下部の該当する「記録」ボタンを選択してください。"
        }
        Msg::ConfirmCheckIn => "現在時刻 {date} を出勤時刻として登録しますか?",
        Msg::ConfirmCheckOut => "現在時刻 {date} を退勤時刻として登録しますか?",
        Msg::ManualSignInPrompt => "出勤時刻を入力してください。",
        Msg::ManualSignOutPrompt => "退勤時刻を入力してください。",
        Msg::TimeFormatHint => {
            "時刻は24時間表記の4桁の数字(hhmm)で入力してください。例えば午後8時20分の場合は 2020 と入力します。"
        }
        Msg::CouldNotUnderstand => {
            "入力された時刻を認識できませんでした。入力方法を確認して、もう一度時刻を入力してください。"
        }
        Msg::CheckOutBeforeCheckIn => {
            "退勤時刻が出勤時刻より前になっています。退勤時刻を確認して、もう一度入力してください。"
        }
        Msg::CheckedIn => "出勤時刻を登録しました。",
        Msg::CheckedOut => {
            "退勤時刻を登録しました。{date}の総勤務時間は{hours}時間{minutes}分です。"
        }
        Msg::CheckedOutMinutes => "退勤時刻を登録しました。{date}の総勤務時間は{minutes}分です。",
        Msg::RecordClockIn => "出勤を記録",
        Msg::RecordClockOut => "退勤を記録",
        Msg::StartOver => "最初から",
        Msg::CheckInTitle => "{account}の{date}の出勤時刻",
        Msg::WorkingHoursTitle => "{account}の{date}の勤務時間",
    }
}

fn ko(msg: Msg) -> &'static str {
    match msg {
        Msg::Greeting => {
            "안녕하세요, 출퇴근 시간의 기록과 관리를 도와드리는 WORKS 근태 관리 봇입니다."
        }
        Msg::TryNow => "시작하기",
        Msg::ToFirst => "출근 및 퇴근 시 메뉴 하단의 \"기록\"을 선택해 주세요.",
        Msg::SignInMenu => "출근 시간 입력 방법을 선택해 주세요.",
        Msg::SignOutMenu => "퇴근 시간 입력 방법을 선택해 주세요.",
        Msg::CurrentTime => "현재 시간",
        Msg::ManuallyEnter => "직접 입력",
        Msg::Yes => "예",
        Msg::No => "아니요",
        Msg::AlreadyClockedIn => {
            "이미 출근 시간이 있습니다. 퇴근 시 메뉴 하단의 \"기록\"을 선택해 주세요."
        }
        Msg::AlreadyClockedOut => {
            "이미 퇴근 시간이 있습니다. 출근 시 메뉴 하단의 \"기록\"을 선택해 주세요."
        }
        Msg::NotClockedIn => {
            "오늘의 출근 시간이 등록되지 않았습니다. 메뉴 하단의 \"출근 기록\"을 선택하고 출근 시간을 입력해 주세요."
        }
        Msg::InvalidAction => {
            "입력하신 내용을 이해하지 못했습니다. 출근 또는 퇴근 시 메뉴 하단의 해당 \"기록\" 버튼을 선택해 주세요."
        }
        Msg::ConfirmCheckIn => "현재 시간 {date}을(를) 출근 시간으로 등록하시겠습니까?",
        Msg::ConfirmCheckOut => "현재 시간 {date}을(를) 퇴근 시간으로 등록하시겠습니까?",
        Msg::ManualSignInPrompt => "출근 시간을 직접 입력해 주세요.",
        Msg::ManualSignOutPrompt => "퇴근 시간을 직접 입력해 주세요.",
        Msg::TimeFormatHint => {
            "시간은 24시간 형식의 숫자 4자리(hhmm)로 입력해 주세요. 예를 들어 오후 8시 20분은 2020으로 입력합니다."
        }
        Msg::CouldNotUnderstand => {
            "입력하신 시간을 인식하지 못했습니다. 입력 방법을 확인한 후 다시 입력해 주세요."
        }
        Msg::CheckOutBeforeCheckIn => {
            "퇴근 시간이 출근 시간보다 이전으로 기록되었습니다. 퇴근 시간을 확인하고 다시 입력해 주세요."
        }
        Msg::CheckedIn => "출근 시간이 등록되었습니다.",
        Msg::CheckedOut => {
            "퇴근 시간이 등록되었습니다. {date}의 총 근무 시간은 {hours}시간 {minutes}분입니다."
        }
        Msg::CheckedOutMinutes => {
            "퇴근 시간이 등록되었습니다. {date}의 총 근무 시간은 {minutes}분입니다."
        }
        Msg::RecordClockIn => "출근 기록",
        Msg::RecordClockOut => "퇴근 기록",
        Msg::StartOver => "처음으로",
        Msg::CheckInTitle => "{account}의 {date} 출근 시간",
        Msg::WorkingHoursTitle => "{account}의 {date} 근무 시간",
    }
}
