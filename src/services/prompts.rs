//! Instruction text for every supported language.
//!
//! Templates carry `{title}` and `{author}` placeholders that are filled in
//! when a section instruction is requested. Unsupported language codes resolve
//! to English, and the returned [`LanguageSelection`] records that it happened.

use crate::models::{GuideType, Language, LanguageSelection, Section};

struct PromptSet {
    system: &'static str,
    chapters: &'static str,
    synthesis: &'static str,
    quiz: &'static str,
    chat: &'static str,
    unknown_author: &'static str,
}

const EN: PromptSet = PromptSet {
    system: "You are an expert educator creating a comprehensive study guide for a book.",
    chapters: "Create a chapter-by-chapter summary for '{title}' by {author}. For each chapter, include: 1) Brief summary (100-150 words), 2) Key concepts, 3) Two thought-provoking questions.",
    synthesis: "Create a synthesis of the main ideas in '{title}' by {author}. Include: 1) Core themes, 2) Key insights, 3) Practical applications, 4) Action plan for implementing the book's teachings.",
    quiz: "Create 10 multiple-choice questions to test understanding of '{title}' by {author}. Each question should have 4 options with one correct answer. Include explanation for the correct answer.",
    chat: "You are a helpful AI assistant that answers questions about books. Answer based only on the book content provided. If the answer is not in the book content, say so politely.",
    unknown_author: "an unknown author",
};

const ES: PromptSet = PromptSet {
    system: "Eres un educador experto que crea una guía de estudio completa para un libro.",
    chapters: "Crea un resumen capítulo por capítulo de '{title}' de {author}. Para cada capítulo, incluye: 1) Breve resumen (100-150 palabras), 2) Conceptos clave, 3) Dos preguntas para reflexionar.",
    synthesis: "Crea una síntesis de las ideas principales de '{title}' de {author}. Incluye: 1) Temas centrales, 2) Ideas clave, 3) Aplicaciones prácticas, 4) Plan de acción para implementar las enseñanzas del libro.",
    quiz: "Crea 10 preguntas de opción múltiple para evaluar la comprensión de '{title}' de {author}. Cada pregunta debe tener 4 opciones con una respuesta correcta. Incluye explicación para la respuesta correcta.",
    chat: "Eres un asistente de IA útil que responde preguntas sobre libros. Responde basándote únicamente en el contenido del libro proporcionado. Si la respuesta no está en el contenido del libro, dilo educadamente.",
    unknown_author: "autor desconocido",
};

const ZH: PromptSet = PromptSet {
    system: "您是一位专家教育者，为一本书创建全面的学习指南。",
    chapters: "为{author}的《{title}》创建逐章摘要。对于每一章，包括：1）简短摘要（100-150字），2）关键概念，3）两个发人深省的问题。",
    synthesis: "创建{author}的《{title}》中主要思想的综合。包括：1）核心主题，2）关键见解，3）实际应用，4）实施书中教导的行动计划。",
    quiz: "创建10个选择题来测试对{author}的《{title}》的理解。每个问题应有4个选项，其中一个正确答案。包括正确答案的解释。",
    chat: "您是一位有用的AI助手，可以回答有关书籍的问题。仅根据提供的书籍内容回答。如果答案不在书籍内容中，请礼貌地说明。",
    unknown_author: "佚名作者",
};

const HI: PromptSet = PromptSet {
    system: "आप एक किताब के लिए व्यापक अध्ययन गाइड बनाने वाले विशेषज्ञ शिक्षक हैं।",
    chapters: "{author} द्वारा '{title}' का अध्याय-दर-अध्याय सारांश बनाएं। प्रत्येक अध्याय के लिए, शामिल करें: 1) संक्षिप्त सारांश (100-150 शब्द), 2) प्रमुख अवधारणाएँ, 3) दो विचारोत्तेजक प्रश्न।",
    synthesis: "{author} द्वारा '{title}' में मुख्य विचारों का संश्लेषण बनाएं। शामिल करें: 1) मुख्य विषय, 2) प्रमुख अंतर्दृष्टि, 3) व्यावहारिक अनुप्रयोग, 4) पुस्तक की शिक्षाओं को लागू करने के लिए कार्य योजना।",
    quiz: "{author} द्वारा '{title}' की समझ का परीक्षण करने के लिए 10 बहुविकल्पीय प्रश्न बनाएं। प्रत्येक प्रश्न में 4 विकल्प होने चाहिए जिनमें एक सही उत्तर है। सही उत्तर के लिए स्पष्टीकरण शामिल करें।",
    chat: "आप एक सहायक AI सहायक हैं जो पुस्तकों के बारे में प्रश्नों का उत्तर देता है। केवल प्रदान की गई पुस्तक सामग्री के आधार पर उत्तर दें। यदि उत्तर पुस्तक सामग्री में नहीं है, तो विनम्रता से कहें।",
    unknown_author: "अज्ञात लेखक",
};

const RU: PromptSet = PromptSet {
    system: "Вы эксперт-педагог, создающий комплексное учебное руководство по книге.",
    chapters: "Создайте краткое изложение книги '{title}' автора {author} по главам. Для каждой главы включите: 1) Краткое содержание (100-150 слов), 2) Ключевые концепции, 3) Два вопроса для размышления.",
    synthesis: "Создайте синтез основных идей книги '{title}' автора {author}. Включите: 1) Основные темы, 2) Ключевые выводы, 3) Практическое применение, 4) План действий по внедрению учений книги.",
    quiz: "Создайте 10 вопросов с множественным выбором для проверки понимания книги '{title}' автора {author}. Каждый вопрос должен иметь 4 варианта ответа с одним правильным. Включите объяснение правильного ответа.",
    chat: "Вы - полезный ИИ-ассистент, который отвечает на вопросы о книгах. Отвечайте только на основе предоставленного содержания книги. Если ответа нет в содержании книги, вежливо скажите об этом.",
    unknown_author: "неизвестного автора",
};

fn prompt_set(language: Language) -> &'static PromptSet {
    match language {
        Language::En => &EN,
        Language::Es => &ES,
        Language::Zh => &ZH,
        Language::Hi => &HI,
        Language::Ru => &RU,
    }
}

/// Normalize a requested language code, falling back to English.
pub fn resolve_language(code: &str) -> LanguageSelection {
    match Language::from_code(code) {
        Some(language) => LanguageSelection {
            requested: code.to_string(),
            language,
            fell_back: false,
        },
        None => {
            tracing::warn!(requested = code, "unsupported language, using en");
            LanguageSelection {
                requested: code.to_string(),
                language: Language::DEFAULT,
                fell_back: true,
            }
        }
    }
}

/// Clause appended to the system instruction for a guide type.
pub fn guide_type_modifier(guide_type: GuideType) -> Option<&'static str> {
    match guide_type {
        GuideType::Standard => None,
        GuideType::Academic => Some(" Focus on academic analysis and critical thinking."),
        GuideType::Practical => Some(" Focus on practical applications and exercises."),
        GuideType::Summary => Some(" Focus on concise summaries and key takeaways."),
    }
}

pub fn system_instruction(language: Language, guide_type: GuideType) -> String {
    let mut instruction = prompt_set(language).system.to_string();
    if let Some(modifier) = guide_type_modifier(guide_type) {
        instruction.push_str(modifier);
    }
    instruction
}

pub fn section_instruction(
    language: Language,
    section: Section,
    title: &str,
    author: Option<&str>,
) -> String {
    let set = prompt_set(language);
    let template = match section {
        Section::Chapters => set.chapters,
        Section::Synthesis => set.synthesis,
        Section::Quiz => set.quiz,
    };
    let author = author
        .map(str::trim)
        .filter(|author| !author.is_empty())
        .unwrap_or(set.unknown_author);

    template.replace("{title}", title).replace("{author}", author)
}

pub fn chat_instruction(language: Language) -> &'static str {
    prompt_set(language).chat
}
