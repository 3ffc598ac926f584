//! Static bot content
//!
//! Every user-facing text block lives here so the flow logic only decides
//! *which* block to send. Blocks use Telegram's legacy Markdown dialect.

use crate::risk::{RiskResult, MAX_SCORE, QUESTION_COUNT, RISK_QUESTIONS};

// ============================================================================
// Menu
// ============================================================================

pub const LABEL_RISK_QUIZ: &str = "📊 Calcular Riesgo";
pub const LABEL_EMERGENCY: &str = "📞 Números Emergencia";
pub const LABEL_REPORT: &str = "📝 Reportar Socavón";
pub const LABEL_INFO: &str = "ℹ️ Info Socavones";
pub const LABEL_GUIDE: &str = "🆘 Ayuda Inmediata";
/// Keyboard shortcut for `/cancelar`
pub const LABEL_CANCEL: &str = "🛑 Cancelar";

/// Reply keyboard layout: 3 rows, 6 buttons
pub const MENU_KEYBOARD: [&[&str]; 3] = [
    &[LABEL_RISK_QUIZ, LABEL_EMERGENCY],
    &[LABEL_REPORT, LABEL_INFO],
    &[LABEL_GUIDE, LABEL_CANCEL],
];

/// Entries the menu router dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    RiskQuiz,
    EmergencyNumbers,
    Report,
    HazardInfo,
    ImmediateHelp,
}

impl MenuOption {
    pub const ALL: [MenuOption; 5] = [
        MenuOption::RiskQuiz,
        MenuOption::EmergencyNumbers,
        MenuOption::Report,
        MenuOption::HazardInfo,
        MenuOption::ImmediateHelp,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::RiskQuiz => LABEL_RISK_QUIZ,
            MenuOption::EmergencyNumbers => LABEL_EMERGENCY,
            MenuOption::Report => LABEL_REPORT,
            MenuOption::HazardInfo => LABEL_INFO,
            MenuOption::ImmediateHelp => LABEL_GUIDE,
        }
    }

    /// Exact, case-sensitive label lookup
    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.label() == text)
    }
}

// ============================================================================
// Emergency contacts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmergencyContact {
    pub name: &'static str,
    pub phone: &'static str,
}

pub const EMERGENCY_CONTACTS: [EmergencyContact; 5] = [
    EmergencyContact {
        name: "Protección Civil",
        phone: "555-123-4567",
    },
    EmergencyContact {
        name: "Bomberos",
        phone: "555-123-4568",
    },
    EmergencyContact {
        name: "Locatel",
        phone: "555-565-8111",
    },
    EmergencyContact {
        name: "Sismos",
        phone: "555-123-4569",
    },
    EmergencyContact {
        name: "Emergencias General",
        phone: "911",
    },
];

// ============================================================================
// Fixed text blocks
// ============================================================================

pub const WELCOME: &str = "\
🚨 *BOT DE ALERTA DE SOCAVONES - CDMX* 🚨

*¡Bienvenido/a!* Este bot te ayuda a:

📊 *Calcular Riesgo* - Evalúa el nivel de peligro en tu zona
📞 *Emergencias* - Muestra números de contacto importantes
📝 *Reportar* - Registra socavones o señales de peligro
ℹ️ *Información* - Aprende sobre prevención de socavones
🆘 *Ayuda* - Guía de acción rápida en emergencias

Puedes usar /cancelar en cualquier momento.

*Selecciona una opción del menú:*";

pub const HAZARD_INFO: &str = "\
🔍 *INFORMACIÓN SOBRE SOCAVONES - CDMX*

*¿Qué son los socavones?*
Son hundimientos bruscos del suelo causados por la erosión interna del subsuelo.

*🔴 SEÑALES DE PELIGRO:*
• Grietas en el suelo o paredes
• Hundimientos leves del pavimento
• Charcos que no se secan sin lluvia
• Sonidos huecos al caminar
• Postes o árboles inclinados

*📍 ZONAS DE ALTO RIESGO EN CDMX:*
• Iztapalapa
• Gustavo A. Madero
• Tláhuac
• Xochimilco

*📞 NÚMEROS IMPORTANTES:*
• Protección Civil: 555-123-4567
• Locatel: 555-565-8111
• Emergencias: 911";

pub const IMMEDIATE_HELP: &str = "\
🆘 *ACCIÓN INMEDIATA - SOCAVÓN DETECTADO*

*🚨 QUÉ HACER AHORA:*

1. ✅ *ALÉJESE* - Mínimo 50 metros del área
2. ✅ *BLOQUEE* - Impida el paso de personas y vehículos
3. ✅ *LLAME* - Contacte Protección Civil: `555-123-4567`
4. ✅ *ALERTE* - Advierta a vecinos y transeúntes

*📋 PASOS SIGUIENTES:*
5. *REPORTE* - Use este bot para registro oficial
6. *DOCUMENTE* - Tome fotos desde distancia segura
7. *COORDINE* - Espere instrucciones de autoridades

*❌ QUÉ NO HACER:*
• ❌ No se acerque al borde
• ❌ No deje que niños se aproximen
• ❌ No intente cubrirlo usted mismo
• ❌ No ignore señales de advertencia

*📞 EMERGENCIAS: 911*";

pub const REPORT_INSTRUCTIONS: &str = "\
📝 *REPORTE DE SOCAVÓN O SEÑAL DE PELIGRO*

Por favor envíe la siguiente información en UN solo mensaje:

*📍 UBICACIÓN:*
- Calle, número, colonia
- Punto de referencia

*📏 DESCRIPCIÓN:*
- Tamaño aproximado
- Profundidad (si es visible)
- Estado actual

*Ejemplo de reporte completo:*
\"Av. Central #123, Col. Centro, frente al mercado. Socavón de aproximadamente 1 metro de diámetro, profundidad desconocida. Hay grietas alrededor y el área está acordonada.\"

*⚠️ IMPORTANTE:* Manténgase a una distancia segura al reportar";

pub const QUIZ_HEADER: &str = "\
📊 *EVALUACIÓN DE RIESGO DE SOCAVONES*

Responda las siguientes 4 preguntas con SÍ o NO:";

pub const INVALID_ANSWER: &str = "⚠️ Por favor responda con SÍ o NO";

pub const CANCELLED: &str = "\
🛑 Operación cancelada.

Use el menú para seleccionar otra opción.";

pub const USE_MENU: &str = "ℹ️ Por favor use los botones del menú para interactuar con el bot.";

// ============================================================================
// Rendered blocks
// ============================================================================

/// Telegram's `sendMessage` text limit, in characters
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Characters legacy Markdown treats as entity markers
const MARKDOWN_SPECIAL: [char; 4] = ['_', '*', '`', '['];

const REPORT_ACK_HEADER: &str = "✅ *REPORTE REGISTRADO EXITOSAMENTE*";
const REPORT_ECHO_LABEL: &str = "*Su reporte ha sido recibido:*";
const REPORT_ECHO_ABOVE: &str = "*Su reporte fue recibido completo en los mensajes anteriores.*";

/// Numbered quiz prompt, e.g. `*Pregunta 2:* ...`
///
/// `index` past the last question renders the last one; a quiz session
/// never holds a full answer set, so callers stay in range.
pub fn question(index: usize) -> String {
    let index = index.min(QUESTION_COUNT - 1);
    format!(
        "*Pregunta {}:* {}",
        index + 1,
        RISK_QUESTIONS[index].prompt
    )
}

pub fn quiz_intro() -> String {
    format!("{QUIZ_HEADER}\n\n{}", question(0))
}

pub fn invalid_answer(index: usize) -> String {
    format!("{INVALID_ANSWER}\n\n{}", question(index))
}

pub fn emergency_numbers() -> String {
    let mut text = String::from("🚨 *NÚMEROS DE EMERGENCIA - CDMX* 🚨\n\n*📞 CONTACTOS IMPORTANTES:*\n");
    for contact in &EMERGENCY_CONTACTS {
        text.push_str(&format!("• *{}:* `{}`\n", contact.name, contact.phone));
    }
    text.push_str("\n💡 *Consejo:* Guarde estos números en su teléfono");
    text
}

pub fn risk_result(result: &RiskResult) -> String {
    let mut text = format!(
        "📊 *RESULTADO DE LA EVALUACIÓN*\n\n*Nivel de Riesgo:* {}\n*Puntaje:* {}/{MAX_SCORE}\n*Diagnóstico:* {}\n\n*📋 ACCIONES RECOMENDADAS:*\n",
        result.tier.label(),
        result.score,
        result.headline
    );
    for action in result.actions {
        text.push_str("• ");
        text.push_str(action);
        text.push('\n');
    }
    text
}

/// Acknowledgment echoing the report back to the sender.
///
/// Normally a single message. When the echo would push it past
/// `MAX_MESSAGE_CHARS`, the escaped report goes out first in as many
/// messages as needed, followed by the acknowledgment without the echo.
pub fn report_received(report: &str) -> Vec<String> {
    let escaped = escape_markdown(report);
    let single = format!(
        "{REPORT_ACK_HEADER}\n\n{REPORT_ECHO_LABEL}\n\"{escaped}\"\n\n{}",
        report_contacts()
    );
    if single.chars().count() <= MAX_MESSAGE_CHARS {
        return vec![single];
    }

    let mut messages = split_escaped(&escaped, MAX_MESSAGE_CHARS);
    messages.push(format!(
        "{REPORT_ACK_HEADER}\n\n{REPORT_ECHO_ABOVE}\n\n{}",
        report_contacts()
    ));
    messages
}

fn report_contacts() -> String {
    let civil = &EMERGENCY_CONTACTS[0];
    let general = &EMERGENCY_CONTACTS[4];
    format!(
        "*📞 Contacte también directamente a:*\n\
         • {}: `{}`\n\
         • Emergencias: `{}`\n\n\
         *🛡️ Recuerde:*\n\
         - Manténgase a distancia segura\n\
         - Alerte a vecinos\n\
         - No intente cubrir el socavón",
        civil.name, civil.phone, general.phone
    )
}

/// Escape user text for Telegram's legacy Markdown parse mode
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Split escaped text into chunks of at most `limit` characters. An escape
/// (a backslash plus a marker) always stays in one chunk.
fn split_escaped(escaped: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut len = 0;
    let mut chars = escaped.chars().peekable();

    while let Some(c) = chars.next() {
        let escape = match chars.peek() {
            Some(next) if c == '\\' && MARKDOWN_SPECIAL.contains(next) => Some(*next),
            _ => None,
        };
        let width = if escape.is_some() { 2 } else { 1 };
        if len + width > limit {
            chunks.push(std::mem::take(&mut current));
            len = 0;
        }
        current.push(c);
        if let Some(next) = escape {
            current.push(next);
            chars.next();
        }
        len += width;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Inverse of `escape_markdown`, as Telegram renders legacy Markdown text
#[cfg(test)]
pub fn unescape_markdown(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(next) if c == '\\' && MARKDOWN_SPECIAL.contains(next) => {}
            _ => plain.push(c),
        }
    }
    plain
}
