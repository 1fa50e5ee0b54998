/// Provider slug used when a model id has no `/` namespace.
pub const UNKNOWN_PROVIDER: &str = "unknown";

/// Provider slug of a model id: the segment before the first `/`.
pub fn derive_provider(model_id: &str) -> &str {
    match model_id.split_once('/') {
        Some((provider, _)) => provider,
        None => UNKNOWN_PROVIDER,
    }
}

/// Static display-name registry entry.
#[derive(Debug, Clone)]
pub struct Provider {
    pub id: &'static str,
    pub display_name: &'static str,
}

pub const PROVIDERS: &[Provider] = &[
    Provider { id: "openai",                 display_name: "OpenAI" },
    Provider { id: "anthropic",              display_name: "Anthropic" },
    Provider { id: "meta",                   display_name: "Meta" },
    Provider { id: "google",                 display_name: "Google" },
    Provider { id: "mistralai",              display_name: "Mistral AI" },
    Provider { id: "cohere",                 display_name: "Cohere" },
    Provider { id: "01-ai",                  display_name: "01.AI" },
    Provider { id: "x-ai",                   display_name: "xAI" },
    Provider { id: "deepseek",               display_name: "DeepSeek" },
    Provider { id: "qwen",                   display_name: "Qwen" },
    Provider { id: "microsoft",              display_name: "Microsoft" },
    Provider { id: "amazon",                 display_name: "Amazon" },
    Provider { id: "nvidia",                 display_name: "NVIDIA" },
    Provider { id: "perplexity",             display_name: "Perplexity" },
    Provider { id: "minimax",                display_name: "MiniMax" },
    Provider { id: "z-ai",                   display_name: "Z.ai" },
    Provider { id: "kilo",                   display_name: "Kilo" },
    Provider { id: "together",               display_name: "Together AI" },
    Provider { id: "groq",                   display_name: "Groq" },
    Provider { id: "fireworks",              display_name: "Fireworks" },
    Provider { id: "databricks",             display_name: "Databricks" },
    Provider { id: "inflection",             display_name: "Inflection" },
    Provider { id: "ai21",                   display_name: "AI21" },
    Provider { id: "allenai",                display_name: "AllenAI" },
    Provider { id: "liquid-ai",              display_name: "Liquid AI" },
    Provider { id: "nousresearch",           display_name: "Nous Research" },
    Provider { id: "teknium",                display_name: "Teknium" },
    Provider { id: "open-orca",              display_name: "Open Orca" },
    Provider { id: "cognitive-computations", display_name: "Cognitive Computations" },
    Provider { id: "huggingfaceh4",          display_name: "HuggingFace H4" },
    Provider { id: "openchat",               display_name: "OpenChat" },
    Provider { id: "phind",                  display_name: "Phind" },
    Provider { id: "wizardlm",               display_name: "WizardLM" },
    Provider { id: "gryphe",                 display_name: "Gryphe" },
    Provider { id: "undi95",                 display_name: "Undi95" },
    Provider { id: "jondurbin",              display_name: "Jon Durbin" },
    Provider { id: "austism",                display_name: "Austism" },
    Provider { id: "sophosympatheia",        display_name: "Sophosympatheia" },
    Provider { id: "sao10k",                 display_name: "Sao10k" },
    Provider { id: "neversleep",             display_name: "Neversleep" },
    Provider { id: "pygmalionai",            display_name: "PygmalionAI" },
    Provider { id: "rwkv",                   display_name: "RWKV" },
    Provider { id: "mancer",                 display_name: "Mancer" },
    Provider { id: "lynn",                   display_name: "Lynn" },
    Provider { id: "recursal",               display_name: "Recursal" },
    Provider { id: "alpindale",              display_name: "Alpindale" },
    Provider { id: "thedrummer",             display_name: "TheDrummer" },
    Provider { id: "eva-unit-01",            display_name: "Eva Unit 01" },
    Provider { id: "aetherwiing",            display_name: "Aetherwiing" },
    Provider { id: "liuhaotian",             display_name: "LiuHaotian" },
    Provider { id: "haotian-liu",            display_name: "Haotian Liu" },
    Provider { id: "bytedance",              display_name: "ByteDance" },
    Provider { id: "baidu",                  display_name: "Baidu" },
    Provider { id: "zhipuai",                display_name: "ZhipuAI" },
    Provider { id: "baichuan-inc",           display_name: "Baichuan" },
    Provider { id: "internlm",               display_name: "InternLM" },
    Provider { id: "tiiuae",                 display_name: "TII UAE" },
    Provider { id: "bigcode",                display_name: "BigCode" },
    Provider { id: "eleutherai",             display_name: "EleutherAI" },
    Provider { id: "stabilityai",            display_name: "Stability AI" },
    Provider { id: "mosaicml",               display_name: "MosaicML" },
    Provider { id: "lmsys",                  display_name: "LMSYS" },
    Provider { id: "togethercomputer",       display_name: "Together Computer" },
    Provider { id: "garage-baind",           display_name: "Garage bAInd" },
    Provider { id: "migtissera",             display_name: "Migtissera" },
    Provider { id: "openrouter",             display_name: "OpenRouter" },
];

/// Human-readable provider name: registry lookup, else title-cased slug.
pub fn format_provider_name(slug: &str) -> String {
    let lower = slug.to_lowercase();
    PROVIDERS
        .iter()
        .find(|p| p.id == lower)
        .map(|p| p.display_name.to_string())
        .unwrap_or_else(|| capitalize(slug))
}

/// "liquid-ai" -> "Liquid Ai". Only the first char of each segment changes.
fn capitalize(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
