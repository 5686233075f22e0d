//! Prompt catalog and fixed user-facing copy
//!
//! Each [`Prompt`] is one flow the bot can run against the model. The system
//! prompt text defines the output format the model must follow; the other
//! strings are what the user sees around that call.

use std::fmt;

const TEARDOWN_PROMPT: &str = r"You are a brutally honest but constructive startup analyst. Analyze the startup idea and provide a structured teardown in exactly this format:

**🧠 What You THINK You're Building**
[The founder's mental model — what they believe they're creating, 2-3 sentences]

**🔍 What You're ACTUALLY Building**
[Reality check — the real product/market dynamics they're missing, 2-3 sentences]

**❌ Why a16z Passes**
• [VC concern 1 — specific, data-driven]
• [VC concern 2 — market size or timing issue]
• [VC concern 3 — competition or moat problem]

**📊 Funding Probability Score: X/10**
[1-sentence justification for the score]

**💡 The One Thing That Could Save This**
[1 specific, actionable pivot or insight that could change the outcome]

Keep the tone sharp but not cruel. Make it genuinely useful.";

const ROAST_PROMPT: &str = r"Take the startup idea from the conversation context and give a BRUTALLY HARSH, no-mercy teardown. Channel your inner cynical Silicon Valley VC who has seen 10,000 failed startups. Be specific about why this will fail. Same format but much more savage:

**🔥 What You THINK You're Building**
[Deflate the founder's delusion ruthlessly]

**💀 What You're ACTUALLY Building**
[The harsh reality, with examples of why this never works]

**🚫 Why Every VC Passes (Not Just a16z)**
• [Brutal takedown point 1]
• [Brutal takedown point 2]
• [Brutal takedown point 3]

**📊 Funding Probability Score: X/10**
[Devastating justification — go low unless it's genuinely exceptional]";

const PIVOT_PROMPT: &str = r"Based on the startup idea discussed, suggest 3 genuinely promising pivot directions. Each pivot should address the core problems identified in the teardown while opening up a better market opportunity.

Format exactly like this:

**🔄 Pivot 1: [Name]**
The idea: [What you'd build instead]
Why it's better: [2-3 sentences on why this direction has legs]
Target customer: [Specific persona]

**🔄 Pivot 2: [Name]**
The idea: [What you'd build instead]
Why it's better: [2-3 sentences]
Target customer: [Specific persona]

**🔄 Pivot 3: [Name]**
The idea: [What you'd build instead]
Why it's better: [2-3 sentences]
Target customer: [Specific persona]";

const COMPS_PROMPT: &str = r"Identify 3 real comparable companies to the startup idea discussed. Use only well-known companies from public knowledge (no web search needed). Explain how this startup idea differs from each comp.

Format exactly like this:

**🏢 Comp 1: [Company Name] ([Founded year, status: public/acquired/private])**
What they do: [1 sentence]
Key difference: [How this startup idea is different — 2 sentences]

**🏢 Comp 2: [Company Name] ([Founded year, status])**
What they do: [1 sentence]
Key difference: [How this startup idea is different — 2 sentences]

**🏢 Comp 3: [Company Name] ([Founded year, status])**
What they do: [1 sentence]
Key difference: [How this startup idea is different — 2 sentences]

**⚔️ Competitive Insight:** [1-2 sentences on what this means for the startup's positioning]";

/// Usage message for `/start` and `/help`
pub const WELCOME_MESSAGE: &str = r"👋 *Welcome to Startup Teardown Bot!*

Send me any startup idea and I'll give you a brutally honest, structured analysis:

🧠 What you *think* you're building
🔍 What you're *actually* building
❌ Why a16z passes (3 specific reasons)
📊 Funding probability score (X/10)

*Commands:*
/roastmore — Get a harsher, more brutal version of the last teardown
/pivotme — 3 alternative pivot ideas for your startup
/comparps — Real comparable companies and how you differ
/start — Show this message again

Just type your startup idea to get started! 🚀";

/// Appended to every initial teardown
pub const TEARDOWN_FOOTER: &str = "\n\n---\n*Use /roastmore for a harsher take, /pivotme for pivot ideas, or /comparps for real competitors*";

/// Completion limit for every flow
pub const MAX_OUTPUT_TOKENS: u32 = 800;

/// Sampling temperature for every flow
pub const TEMPERATURE: f32 = 0.8;

/// A flow the bot runs against the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prompt {
    /// Structured critique of a freshly submitted idea
    Teardown,
    Roast,
    Pivots,
    Comps,
}

impl Prompt {
    pub fn system_prompt(self) -> &'static str {
        match self {
            Prompt::Teardown => TEARDOWN_PROMPT,
            Prompt::Roast => ROAST_PROMPT,
            Prompt::Pivots => PIVOT_PROMPT,
            Prompt::Comps => COMPS_PROMPT,
        }
    }

    /// Flow name used in logs
    pub fn flow_name(self) -> &'static str {
        match self {
            Prompt::Teardown => "teardown",
            Prompt::Roast => "roastmore",
            Prompt::Pivots => "pivotme",
            Prompt::Comps => "comparps",
        }
    }

    /// Progress message sent before the model call
    pub fn acknowledgement(self) -> &'static str {
        match self {
            Prompt::Teardown => "🔍 Analyzing your startup idea...",
            Prompt::Roast => "🔥 Preparing the savage version...",
            Prompt::Pivots => "🔄 Generating pivot ideas...",
            Prompt::Comps => "🏢 Finding comparable companies...",
        }
    }

    /// Reply sent when the model call fails
    pub fn failure_reply(self) -> &'static str {
        match self {
            Prompt::Teardown => "❌ Error analyzing your idea. Please try again in a moment.",
            Prompt::Roast => "❌ Error generating roast. Try again in a moment.",
            Prompt::Pivots => "❌ Error generating pivots. Try again in a moment.",
            Prompt::Comps => "❌ Error finding comps. Try again in a moment.",
        }
    }

    /// Whether the stored teardown is passed back as prior context
    pub fn uses_prior_teardown(self) -> bool {
        matches!(self, Prompt::Pivots | Prompt::Comps)
    }

    /// The user turn sent to the model for a given idea
    pub fn user_message(self, idea: &str) -> String {
        match self {
            Prompt::Teardown => format!("Startup idea: {idea}"),
            Prompt::Roast | Prompt::Pivots | Prompt::Comps => idea.to_string(),
        }
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flow_name())
    }
}

/// Guidance sent when a follow-up command arrives before any idea
pub fn missing_idea_message(command: &str) -> String {
    format!("❌ No startup idea in context yet. Send me an idea first, then use /{command}!")
}
