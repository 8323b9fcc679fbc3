//! User-visible strings per interface language

use std::fmt;
use std::str::FromStr;

/// Interface language for the seeded greeting, the fallback reply and the
/// simulated responder's templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Ru,
    En,
}

const RU_TEMPLATES: &[&str] = &[
    "Понимаю ваш вопрос про \"{prompt}\". Это интересная тема для обсуждения. Могу предложить несколько подходов к решению...",
    "Отличный вопрос! По поводу \"{prompt}\" могу сказать, что это требует комплексного анализа. Давайте разберём детально...",
    "Спасибо за вопрос про \"{prompt}\". На основе моих знаний могу предложить следующие варианты решения...",
    "Интересная задача! Касательно \"{prompt}\" - это действительно важная тема. Вот мой взгляд на ситуацию...",
    "Хороший момент для размышлений про \"{prompt}\". Позвольте поделиться аналитикой по этой теме...",
];

const EN_TEMPLATES: &[&str] = &[
    "I understand your question about \"{prompt}\". It's an interesting topic. Here are a few ways to approach it...",
    "Great question! Regarding \"{prompt}\", this calls for a thorough analysis. Let's go through it in detail...",
    "Thanks for asking about \"{prompt}\". Based on what I know, here are some options...",
    "Interesting problem! \"{prompt}\" is a genuinely important topic. Here is how I see it...",
    "A good point to think about: \"{prompt}\". Let me share some analysis on this...",
];

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::Ru => "ru",
            Locale::En => "en",
        }
    }

    /// Seeded assistant message at conversation start
    pub fn greeting(self) -> &'static str {
        match self {
            Locale::Ru => "Привет! Я AI ассистент на базе Google Gemini. Как дела? Чем могу помочь?",
            Locale::En => "Hi! I'm an AI assistant powered by Google Gemini. How are you? How can I help?",
        }
    }

    /// Assistant message appended when a response round fails
    pub fn fallback_text(self) -> &'static str {
        match self {
            Locale::Ru => "Извините, произошла ошибка. Попробуйте ещё раз.",
            Locale::En => "Sorry, something went wrong. Please try again.",
        }
    }

    /// Reply templates; `{prompt}` is replaced with the user's text
    pub fn response_templates(self) -> &'static [&'static str] {
        match self {
            Locale::Ru => RU_TEMPLATES,
            Locale::En => EN_TEMPLATES,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" | "ru-ru" => Ok(Locale::Ru),
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}
