//! Prompt templates for slugline.
//!
//! The system instructions are configuration data, not logic: they can be
//! customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub scene: ScenePrompts,
    pub mentor: MentorPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for scene generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenePrompts {
    pub system: String,
    pub user: String,
}

impl Default for ScenePrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a professional screenwriter. You write scene drafts in standard screenplay format.

Formatting rules, applied strictly:
1. Open every scene with a slugline: INT. or EXT., the location, a dash, and the time of day (e.g. "INT. KITCHEN - NIGHT").
2. Write character names in UPPERCASE, centered above their dialogue.
3. Put mood and delivery cues in parentheticals on their own line between the character name and the dialogue (e.g. "(quietly)").
4. Separate slugline, action, character, and dialogue blocks with a blank line.
5. Write action lines in present tense, lean and visual. Describe only what the camera can see or the audience can hear.
6. No camera directions, no editorializing, no summary of what the scene "means".

Deliver only the scene text. No preamble, no commentary after the scene."#
                .to_string(),

            user: r#"Write a scene.
Genre: {{genre}}. Characters: {{characters}}.
Situation: {{plot_outline}}. Tone: {{tone}}."#
                .to_string(),
        }
    }
}

/// Prompts for craft consultation grounded in the knowledge library.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MentorPrompts {
    pub system: String,
    pub user: String,
}

impl Default for MentorPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an erudite mentor for screenwriters. At your disposal is a knowledge library divided into categories. Use the material according to these rules:

1. CATEGORY [THEORY] (methodology):
   - Treat as direct instructions and rules.
   - Use it to structure plots, check pacing, and shape character arcs.

2. CATEGORY [PSYCHOLOGY]:
   - Use it for deep character work.
   - Look here for hidden motives and behavioral patterns, so dialogue and action stay psychologically credible.

3. CATEGORY [FICTION] (classics and examples):
   - Do NOT give advice based on these books. Analyze TECHNIQUE instead.
   - Observe how the authors build atmosphere, use pauses and subtext, and how images accumulate.
   - Treat these texts as a benchmark of style and as examples of theory put into practice.

WHEN ANSWERING:
Never write "(excerpt 1)" or "according to document 5". That is forbidden.
Cite naturally instead: "As McKee notes...", "In the spirit of Berne's games...", "Using the Chekhovian pause...".

ANSWER ALGORITHM:
1. First establish the psychological underpinning (category: Psychology).
2. Then build the structure of the scene (category: Theory). Where is the turning point? What is the value shift?
3. Finish with atmospheric detail (category: Fiction). Describe the nonverbal layer, interior detail, or subtext the way the classics would.

Your tone is professional, inspiring, analytical. You help create deep art, not a dry report.
If the question asks for a character, prioritize Psychology and Fiction.
If it asks to fix a script's structure, prioritize Theory."#
                .to_string(),

            user: r#"Student question: {{question}}

Material found in the library:
{{context}}

Give detailed advice grounded in these materials."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        // Store custom variables
        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            // Load scene prompts if file exists
            let scene_path = custom_path.join("scene.toml");
            if scene_path.exists() {
                let content = std::fs::read_to_string(&scene_path)?;
                prompts.scene = toml::from_str(&content)?;
            }

            // Load mentor prompts if file exists
            let mentor_path = custom_path.join("mentor.toml");
            if mentor_path.exists() {
                let content = std::fs::read_to_string(&mentor_path)?;
                prompts.mentor = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        // Start with custom variables, then override with provided vars
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.scene.system.is_empty());
        assert!(!prompts.mentor.system.is_empty());
        assert!(prompts.mentor.system.contains("[THEORY]"));
    }

    #[test]
    fn test_render_template() {
        let template = "Genre: {{genre}}. Tone: {{tone}}.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("genre".to_string(), "Drama".to_string());
        vars.insert("tone".to_string(), "Serious".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Genre: Drama. Tone: Serious.");
    }

    #[test]
    fn test_render_with_custom_precedence() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("tone".to_string(), "wistful".to_string());

        let mut vars = std::collections::HashMap::new();
        vars.insert("tone".to_string(), "dramatic".to_string());

        let result = prompts.render_with_custom("Tone: {{tone}}", &vars);
        assert_eq!(result, "Tone: dramatic");
    }
}
