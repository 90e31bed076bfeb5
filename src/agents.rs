use modular_agent_core::{
    Agent, AgentContext, AgentData, AgentError, AgentOutput, AgentSpec, AgentValue, AsAgent,
    ModularAgent, async_trait, modular_agent,
};
use tracing::error;

use crate::config::{ConvertOptions, Engine, HeadingStyle, Platform, TableStyle};

static CATEGORY: &str = "Chat";

static PORT_MARKDOWN: &str = "markdown";
static PORT_TEXT: &str = "text";

static CONFIG_PLATFORM: &str = "platform";
static CONFIG_HEADING_STYLE: &str = "heading_style";
static CONFIG_TABLE_STYLE: &str = "table_style";
static CONFIG_ENGINE: &str = "engine";

/// Agent for converting Markdown into WhatsApp or Telegram formatting.
///
/// # Configuration
/// - `platform`: "whatsapp" (default) or "telegram"
/// - `heading_style`: "none", "bold" (default), "bold-upper", "decorated" or "hierarchical"
/// - `table_style`: "none", "code" (default), "list", "compact" or "unicode"
/// - `engine`: "tree" (default) or "regex"
///
/// Empty or unknown values fall back to the default.
///
/// # Input
/// - `markdown`: String, message (its content), or array of those joined by newlines
///
/// # Output
/// - `text`: The formatted string
#[modular_agent(
    title = "Format",
    category = CATEGORY,
    inputs = [PORT_MARKDOWN],
    outputs = [PORT_TEXT],
    string_config(name = CONFIG_PLATFORM),
    string_config(name = CONFIG_HEADING_STYLE),
    string_config(name = CONFIG_TABLE_STYLE),
    string_config(name = CONFIG_ENGINE),
)]
struct ChatFormatAgent {
    data: AgentData,
}

#[async_trait]
impl AsAgent for ChatFormatAgent {
    fn new(ma: ModularAgent, id: String, spec: AgentSpec) -> Result<Self, AgentError> {
        Ok(Self {
            data: AgentData::new(ma, id, spec),
        })
    }

    async fn process(
        &mut self,
        ctx: AgentContext,
        _port: String,
        value: AgentValue,
    ) -> Result<(), AgentError> {
        let config = self.configs()?;
        let options = ConvertOptions {
            platform: Platform::parse_or_default(&config.get_string_or_default(CONFIG_PLATFORM)),
            heading_style: HeadingStyle::parse_or_default(
                &config.get_string_or_default(CONFIG_HEADING_STYLE),
            ),
            table_style: TableStyle::parse_or_default(
                &config.get_string_or_default(CONFIG_TABLE_STYLE),
            ),
            engine: Engine::parse_or_default(&config.get_string_or_default(CONFIG_ENGINE)),
        };

        let markdown = match extract_markdown(&value) {
            Ok(markdown) => markdown,
            Err(e) => {
                error!("Cannot read markdown input: {}", e);
                return Err(e);
            }
        };

        let text = crate::convert(&markdown, &options);
        self.output(ctx, PORT_TEXT, AgentValue::string(text)).await
    }
}

fn extract_markdown(value: &AgentValue) -> Result<String, AgentError> {
    match value {
        AgentValue::String(s) => Ok(s.to_string()),
        AgentValue::Message(msg) => Ok(msg.content.clone()),
        AgentValue::Array(arr) => {
            let texts: Vec<String> = arr
                .iter()
                .filter_map(|v| {
                    v.as_str()
                        .map(String::from)
                        .or_else(|| v.as_message().map(|m| m.content.clone()))
                })
                .collect();
            Ok(texts.join("\n"))
        }
        _ => Err(AgentError::InvalidValue(
            "Expected string, message, or array of them for markdown".to_string(),
        )),
    }
}
