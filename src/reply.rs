//! Localized message catalogue and keyboard layouts.
//!
//! Every template is a function of [`Lang`]; the router never branches on
//! language itself.

use crate::model::{DriverRecord, Lang};
use crate::outbound::{Button, OutgoingMessage};

pub const ACTION_LANG_RU: &str = "lang_russian";
pub const ACTION_LANG_KZ: &str = "lang_kazakh";
pub const ACTION_CHECK_COUPONS: &str = "check_coupons";
pub const ACTION_HELP: &str = "help";
pub const ACTION_RESTART: &str = "restart";

const WHATSAPP_URL: &str = "https://wa.me/77777776500";

/// Language-selection prompt shown on `/start` and on restart.
pub fn language_prompt() -> OutgoingMessage {
    OutgoingMessage::with_keyboard(
        "Выберите язык / Тілді таңдаңыз:",
        vec![
            vec![Button::callback("🇷🇺 Русский", ACTION_LANG_RU)],
            vec![Button::callback("🇰🇿 Қазақша", ACTION_LANG_KZ)],
        ],
    )
}

/// Confirmation the prompt message is edited into once a language is picked.
pub fn language_chosen(lang: Lang) -> &'static str {
    match lang {
        Lang::Ru => "Вы выбрали русский язык.",
        Lang::Kz => "Сіз қазақ тілін таңдадыңыз.",
    }
}

fn menu_keyboard(lang: Lang) -> Vec<Vec<Button>> {
    let (coupons, whatsapp, help) = match lang {
        Lang::Ru => ("Узнать о купонах", "Наш WhatsApp", "Помощь"),
        Lang::Kz => ("Купондарды білу", "Біздің WhatsApp", "Көмек"),
    };
    vec![
        vec![Button::callback(coupons, ACTION_CHECK_COUPONS)],
        vec![Button::url(whatsapp, WHATSAPP_URL)],
        vec![Button::callback(help, ACTION_HELP)],
    ]
}

/// Main menu sent right after language selection.
pub fn menu(lang: Lang) -> OutgoingMessage {
    let text = match lang {
        Lang::Ru => "Сәлеметсіз бе! Выберите опцию ниже:",
        Lang::Kz => "Сәлеметсіз бе! Опцияны таңдаңыз:",
    };
    OutgoingMessage::with_keyboard(text, menu_keyboard(lang))
}

/// Fallback for free text that does not look like a licence number.
pub fn unknown_request(lang: Lang) -> OutgoingMessage {
    let text = match lang {
        Lang::Ru => {
            "Извините, я не совсем понимаю ваш запрос. Попробуйте использовать кнопки ниже \
             или введите ваш ВУ номер."
        }
        Lang::Kz => {
            "Кешіріңіз, мен сіздің сұрағыңызды түсінбедім. Төмендегі батырмаларды \
             пайдаланыңыз немесе ВУ нөміріңізді енгізіңіз."
        }
    };
    OutgoingMessage::with_keyboard(text, menu_keyboard(lang))
}

pub fn enter_license_prompt(lang: Lang) -> OutgoingMessage {
    let text = match lang {
        Lang::Ru => "Введите ваш ВУ номер, чтобы узнать информацию о купонах.",
        Lang::Kz => "Купон туралы ақпаратты алу үшін ВУ нөміріңізді енгізіңіз.",
    };
    OutgoingMessage::text(text)
}

pub fn help(lang: Lang) -> OutgoingMessage {
    let text = match lang {
        Lang::Ru => {
            "Если у вас есть вопросы или нужна помощь, напишите нам на WhatsApp: \
             📞 +7 777 777 65 00."
        }
        Lang::Kz => {
            "Егер сұрақтарыңыз болса немесе көмек қажет болса, бізге WhatsApp-қа жазыңыз: \
             📞 +7 777 777 65 00."
        }
    };
    OutgoingMessage::text(text)
}

/// Personal reply for a roster hit.
pub fn found_reply(record: &DriverRecord, lang: Lang) -> OutgoingMessage {
    let text = match lang {
        Lang::Ru => format!(
            "Здравствуйте, уважаемый {}!🤝\n\n\
             🕋 Мы проводим розыгрыш путёвки в УМРУ!\n\
             🏆 Для участия в розыгрыше необходимо выполнять заказы.\n\
             🎟 За каждые 100 выполненных заказов = 1 купон.\n\n\
             📅 Заказы нужно было выполнять в следующие периоды:\n\
             21.02.2025 - 28.02.2025\n\
             01.03.2025 - 07.03.2025\n\n\
             У вас выполнено {} заказов, поэтому у вас есть {} купонов.\n\
             Номера ваших купонов: {}.\n\n\
             Если у вас есть вопросы или нужна помощь, свяжитесь с нами:\n\
             📞 +7 777 777 65 00\n\n\
             С уважением, таксопарк \"Автопартнёр\"!",
            record.name, record.order_count, record.coupon_count, record.coupon_numbers
        ),
        Lang::Kz => format!(
            "Сәлеметсіз бе, Құрметті {}!🤝\n\n\
             🕋 Біз УМРАҒА жолдама ұтыс ойынын өткіземіз!\n\
             🏆 Ұтысқа қатысу үшін тапсырыстар орындау қажет.\n\
             🎟 Әрбір 100 орындалған тапсырысқа = 1 купон.\n\n\
             📅 Мына кезеңдерде тапсырыстарды орындау қажет болды:\n\
             21.02.2025 - 28.02.2025\n\
             01.03.2025 - 07.03.2025\n\n\
             Сізде {} тапсырыс орындалғандықтан, сізде {} купон бар.\n\
             Сіздің купон сандарыңыз: {}.\n\n\
             Егер сұрақтарыңыз болса немесе көмек қажет болса, бізге хабарласыңыз:\n\
             📞 +7 777 777 65 00\n\n\
             Құрметпен, \"Автопартнер\" таксопаркі!",
            record.name, record.order_count, record.coupon_count, record.coupon_numbers
        ),
    };
    OutgoingMessage::text(text)
}

/// Reply for an identifier-shaped query with no roster match.
pub fn not_found_reply(lang: Lang) -> OutgoingMessage {
    let text = match lang {
        Lang::Ru => {
            "Здравствуйте, уважаемый водитель!🤝\n\n\
             Вашего ВУ номера нет в нашей базе. Это означает, что вы ещё не выполнили \
             100 заказов.\n\n\
             🕋 Мы проводим розыгрыш путёвки в УМРУ!\n\
             🏆 За каждые 100 выполненных заказов = 1 купон.\n\n\
             📅 Заказы нужно было выполнять в следующие периоды:\n\
             21.02.2025 - 28.02.2025\n\
             01.03.2025 - 07.03.2025\n\n\
             Ещё есть время! Выполняйте заказы, и мы добавим вас в список участников! 💪\n\n\
             Если у вас есть вопросы или нужна помощь, свяжитесь с нами:\n\
             📞 +7 777 777 65 00 (WhatsApp)\n\n\
             С уважением, таксопарк \"Автопартнёр\"!"
        }
        Lang::Kz => {
            "Сәлеметсіз бе, Құрметті жүргізуші!🤝\n\n\
             Сіздің ВУ нөміріңіз қазіргі уақытта біздің базада жоқ. Бұл сіз әлі 100 \
             тапсырысты орындамағаныңызды білдіреді.\n\n\
             🕋 Біз УМРАҒА жолдама ұтыс ойынын өткіземіз!\n\
             🏆 Ұтысқа қатысу үшін әрбір 100 орындалған тапсырыстан 1 купон беріледі.\n\n\
             📅 Мына кезеңдерде тапсырыстарды орындау қажет болды:\n\
             21.02.2025 - 28.02.2025\n\
             01.03.2025 - 07.03.2025\n\n\
             Әлі де уақыт бар! Тапсырыстарыңызды орындаңыз және біз сіздің атыңызды \
             тізімге қосуды күтеміз! 💪\n\n\
             Егер сұрақтарыңыз болса немесе көмек қажет болса, бізге хабарласыңыз:\n\
             📞 +7 777 777 65 00 (WhatsApp)\n\n\
             Құрметпен, \"Автопартнер\" таксопаркі!"
        }
    };
    OutgoingMessage::text(text)
}

/// Notice sent by the activity monitor when a session is evicted.
/// Carries the single reset action; the session is already gone.
pub fn idle_notice() -> OutgoingMessage {
    OutgoingMessage::with_keyboard(
        "Вы долго не были активны. Нажмите 'Начать сначала', чтобы продолжить.",
        vec![vec![Button::callback("Начать сначала", ACTION_RESTART)]],
    )
}
