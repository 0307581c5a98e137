//! Prompt templates, one per modification strategy.

use art_core::{Creativity, Lineage, ModificationStrategy};

/// Number of prior concepts and strategies fed into history-aware templates.
pub const HISTORY_WINDOW: usize = 3;

const SNIPPET_CHARS: usize = 100;

/// Inputs a template may draw from.
pub struct PromptContext<'a> {
    pub current_concept: &'a str,
    pub original_concept: &'a str,
    pub recent_concepts: Vec<&'a str>,
    pub history_summary: String,
    pub feedback: &'a str,
}

impl<'a> PromptContext<'a> {
    pub fn from_lineage(lineage: &'a Lineage, feedback: &'a str) -> Self {
        Self {
            current_concept: &lineage.latest().concept,
            original_concept: lineage.original_concept(),
            recent_concepts: lineage.recent_concepts(HISTORY_WINDOW),
            history_summary: strategy_history_summary(lineage),
            feedback: feedback.trim(),
        }
    }
}

/// Refinement request built for a strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub prompt: String,
    pub creativity: Creativity,
}

/// Tag of an iteration as shown in prompts; the seed has none.
fn history_tag(strategy: Option<ModificationStrategy>) -> &'static str {
    strategy.map_or("initial_creation", |s| s.as_str())
}

fn snippet(text: &str) -> String {
    if text.chars().count() > SNIPPET_CHARS {
        let cut: String = text.chars().take(SNIPPET_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Rolling summary of the last few strategies with concept snippets.
pub fn strategy_history_summary(lineage: &Lineage) -> String {
    lineage
        .recent(HISTORY_WINDOW)
        .iter()
        .map(|it| format!("- {}: {}\n", history_tag(it.strategy_label), snippet(&it.concept)))
        .collect()
}

/// Per-index strategy history used by the selector.
pub fn iteration_history(lineage: &Lineage) -> String {
    lineage
        .iterations()
        .iter()
        .map(|it| format!("- Iteration {}: {}\n", it.index, history_tag(it.strategy_label)))
        .collect()
}

fn with_feedback(mut prompt: String, feedback: &str) -> String {
    if !feedback.is_empty() {
        prompt.push_str("\n\nArtist feedback to take into account:\n");
        prompt.push_str(feedback);
    }
    prompt
}

/// Build the refinement instruction for `strategy`.
///
/// Returns `None` for [`ModificationStrategy::NoModification`], which reuses
/// the current concept without refinement.
pub fn build_instruction(strategy: ModificationStrategy, ctx: &PromptContext<'_>) -> Option<Instruction> {
    let creativity = strategy.creativity()?;
    let body = match strategy {
        ModificationStrategy::NoModification => return None,
        ModificationStrategy::UnsystematicChange => unsystematic_change(ctx),
        ModificationStrategy::IdeaBasedChange => idea_based_change(ctx),
        ModificationStrategy::QuantitativeModification => quantitative_modification(ctx),
        ModificationStrategy::SubjectModification => subject_modification(ctx),
        ModificationStrategy::SubjectWithMethodRefinement => subject_with_method_refinement(ctx),
        ModificationStrategy::StructureModification => structure_modification(ctx),
        ModificationStrategy::ConceptModification => concept_modification(ctx),
    };

    Some(Instruction {
        prompt: with_feedback(body, ctx.feedback),
        creativity,
    })
}

fn unsystematic_change(ctx: &PromptContext<'_>) -> String {
    format!(
        "Take this artistic concept and introduce random, unpredictable modifications:\n\n\
         Current concept: {}\n\n\
         Introduce elements of chance, randomness, or unexpected juxtapositions. \
         The changes should be unsystematic rather than following a clear pattern.",
        ctx.current_concept
    )
}

fn idea_based_change(ctx: &PromptContext<'_>) -> String {
    format!(
        "Develop a new artistic concept based on ideas from previous iterations:\n\n\
         Current concept: {}\n\n\
         Previous concepts and ideas:\n{}\n\n\
         Create a new concept that:\n\
         1. Builds upon elements or themes from previous iterations\n\
         2. Combines or transforms these elements in new ways\n\
         3. Develops the artistic direction based on the trajectory of previous works\n\
         4. Creates meaningful connections to the artistic journey so far",
        ctx.current_concept,
        ctx.recent_concepts.join("\n")
    )
}

fn quantitative_modification(ctx: &PromptContext<'_>) -> String {
    format!(
        "Modify this artistic concept by changing quantitative aspects such as size, scale, \
         proportions, or materials:\n\n\
         Current concept: {}\n\n\
         Make quantitative modifications such as:\n\
         1. Changing the scale or size of elements\n\
         2. Altering the number or density of components\n\
         3. Shifting proportions or ratios between elements\n\
         4. Modifying material properties (texture, weight, transparency)\n\
         5. Adjusting color intensity, saturation, or contrast\n\n\
         Keep the core artistic approach and subject matter the same while transforming \
         these quantitative aspects.",
        ctx.current_concept
    )
}

fn subject_modification(ctx: &PromptContext<'_>) -> String {
    format!(
        "Transform this artistic concept by changing the subject while maintaining the same \
         artistic approach:\n\n\
         Current concept: {}\n\n\
         Steps:\n\
         1. Identify the current subject and artistic technique or style\n\
         2. Replace the subject with a new one that creates interesting tensions or relationships\n\
         3. Apply the same artistic treatment to this new subject\n\
         4. Keep the same level of detail and technical approach\n\n\
         Provide a detailed revised concept that changes only the subject matter while \
         preserving the artistic methodology.",
        ctx.current_concept
    )
}

fn subject_with_method_refinement(ctx: &PromptContext<'_>) -> String {
    format!(
        "Transform this artistic concept by changing the subject and making minor refinements \
         to the methodology:\n\n\
         Current concept: {}\n\n\
         Steps:\n\
         1. Identify the current subject and artistic technique or style\n\
         2. Replace the subject with a new one that creates interesting tensions or relationships\n\
         3. Keep the general artistic approach but add subtle refinements suited to the new subject\n\
         4. Consider how small methodological adjustments can better serve the new subject matter\n\n\
         Provide a detailed revised concept that changes the subject matter and slightly \
         refines the artistic methodology.",
        ctx.current_concept
    )
}

fn structure_modification(ctx: &PromptContext<'_>) -> String {
    format!(
        "Take this artistic concept and develop a new methodological structure while \
         maintaining the core concept:\n\n\
         Original concept: {}\n\
         Current concept: {}\n\n\
         Reimagine the artistic approach by:\n\
         1. Identifying the core thematic elements\n\
         2. Developing a new visual language or compositional structure\n\
         3. Maintaining conceptual integrity while transforming the execution\n\
         4. Creating a cohesive new methodology aligned with the original artistic intent",
        ctx.original_concept, ctx.current_concept
    )
}

fn concept_modification(ctx: &PromptContext<'_>) -> String {
    format!(
        "Create a new artistic concept that represents a significant evolution from the \
         current direction:\n\n\
         Original concept: {}\n\
         Current concept: {}\n\n\
         Artistic journey so far:\n{}\n\
         Develop a new concept that:\n\
         1. Represents a meaningful conceptual advancement\n\
         2. Builds upon insights gained from previous iterations\n\
         3. Introduces a new creative vision or thematic direction\n\
         4. Maintains a connection to the original artistic intent\n\
         5. Suggests innovative technical approaches suitable for the new concept\n\n\
         Create a detailed concept that demonstrates artistic growth and conceptual evolution.",
        ctx.original_concept, ctx.current_concept, ctx.history_summary
    )
}

/// Prompt asking the model to pick a strategy number.
pub fn selection_prompt(lineage: &Lineage, analysis: &str, feedback: &str) -> String {
    let menu: String = ModificationStrategy::ALL
        .iter()
        .map(|s| format!("{}. {}\n", s.number(), s.menu_label()))
        .collect();
    let feedback = feedback.trim();
    let feedback_line = if feedback.is_empty() {
        String::new()
    } else {
        format!("\nUser feedback: {feedback}\n")
    };

    format!(
        "Based on the current image analysis and modification history, select the most \
         appropriate artistic process modification strategy from the options below:\n\n\
         {menu}\n\
         Current image analysis: {analysis}\n\n\
         Modification history:\n{history}{feedback_line}\n\
         Return only the number of the strategy to apply next.",
        history = iteration_history(lineage),
    )
}

/// Prompt that turns a raw idea into an image-generation-ready concept.
pub fn concept_development_prompt(idea: &str) -> String {
    format!(
        "I need to create an artistic concept based on this initial idea: {idea}\n\n\
         Please refine this concept in a way that would work well for an AI image generator.\n\
         Consider:\n\
         - Visual elements that should be included\n\
         - Style, mood, and atmosphere\n\
         - Color palette\n\
         - Composition\n\n\
         Provide a detailed description that could be used as a prompt for image generation."
    )
}
