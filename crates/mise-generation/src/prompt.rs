// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt templates for recipe and meal-plan generation.
//!
//! Output is deterministic for a given parameter set. Required fields are
//! assumed validated; optional ones fall back to fixed defaults.

use mise_core::types::{GenerationParams, MealPlanParams, RecipeParams, present};

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    present(value).unwrap_or(default)
}

/// Build the prompt for either generation variant.
pub fn build_prompt(params: &GenerationParams) -> String {
    match params {
        GenerationParams::Recipe(p) => recipe_prompt(p),
        GenerationParams::MealPlan(p) => meal_plan_prompt(p),
    }
}

/// Recipe prompt. Pins the serving count so the model scales quantities
/// and labels the ingredients section `## Ingredients (Serves N)`.
pub fn recipe_prompt(params: &RecipeParams) -> String {
    let ingredients = or_default(&params.ingredients, "");
    let servings = or_default(&params.serving_number, "");

    [
        "You are a professional chef. Generate a complete recipe with the following parameters:".to_string(),
        format!("- Ingredients to use: {ingredients}"),
        format!("- Meal type: {}", or_default(&params.meal_type, "any")),
        format!("- Cuisine style: {}", or_default(&params.cuisine, "any")),
        format!("- Cooking time: {}", or_default(&params.cooking_time, "flexible")),
        format!("- Difficulty level: {}", or_default(&params.complexity, "moderate")),
        format!("- Dietary preferences: {}", or_default(&params.dietary, "any")),
        format!("- NUMBER OF SERVINGS: {servings}"),
        format!(">>> THE RECIPE MUST BE FOR EXACTLY {servings} SERVINGS."),
        format!(">>> SCALE ALL INGREDIENT QUANTITIES TO MATCH {servings} SERVINGS, NO EXCEPTIONS."),
        ">>> DO NOT default to 2 or 4 servings under any condition.".to_string(),
        format!(">>> Label the ingredients section as: '## Ingredients (Serves {servings})'"),
        ">>> Do NOT include any other serving number anywhere in the recipe.".to_string(),
        ">>> NO NOTE should suggest that the serving size is flexible.".to_string(),
        "Include the following sections:".to_string(),
        "## Recipe Name (creative, in English)".to_string(),
        "## Description (1-2 lines)".to_string(),
        "## Ingredients (with exact quantities, scaled for the number of servings)".to_string(),
        "## Instructions (step-by-step, concise but clear)".to_string(),
        "## Tips (serving or cooking suggestions)".to_string(),
        "Use only the ingredients listed. Format the entire output clearly in markdown.".to_string(),
    ]
    .join("\n")
}

/// One-day meal plan prompt built from a biometric and dietary profile.
pub fn meal_plan_prompt(params: &MealPlanParams) -> String {
    let meals = or_default(&params.meal_count_per_day, "");

    [
        "You are a professional chef and certified nutritionist.".to_string(),
        "Create a personalized meal plan for ONE DAY based on the following user profile:".to_string(),
        String::new(),
        format!("- Age: {}", or_default(&params.age, "")),
        format!("- Weight: {} kg", or_default(&params.weight, "")),
        format!("- Height: {} cm", or_default(&params.height, "")),
        format!("- Sex: {}", or_default(&params.sex, "")),
        format!("- Goal: {}", or_default(&params.goal_and_aspiration, "")),
        format!("- Diet type: {}", or_default(&params.diet, "")),
        format!("- Meals per day: {meals}"),
        format!("- Allergies: {}", or_default(&params.any_allergies, "None")),
        String::new(),
        format!("Generate a total of {meals} distinct meals that cover the full day. Each meal should include:"),
        String::new(),
        ">>> 1. Meal Name (creative, concise)".to_string(),
        ">>> 2. Meal Time Slot (Breakfast, Lunch, Snack, or Dinner)".to_string(),
        ">>> 3. Ingredients with exact quantities (scaled for ONE person)".to_string(),
        ">>> 4. Nutritional Info: Show total Calories, Protein (g), Carbs (g), and Fats (g)".to_string(),
        String::new(),
        ">>> Format the entire response clearly in markdown.".to_string(),
        ">>> DO NOT include preparation steps, instructions, tips, or serving flexibility.".to_string(),
        ">>> DO NOT repeat ingredients across meals unless it's nutritionally optimal.".to_string(),
        String::new(),
        ">>> Example format for each meal:".to_string(),
        "### Meal: Avocado Protein Bowl".to_string(),
        "**Meal Time:** Breakfast".to_string(),
        "**Ingredients:**".to_string(),
        "- 2 boiled eggs".to_string(),
        "- 1 medium avocado".to_string(),
        "- 2 slices whole grain toast".to_string(),
        "- 1 tsp olive oil".to_string(),
        String::new(),
        "**Nutrition:** 525 Calories - 40g Protein - 60g Carbs - 15g Fat".to_string(),
    ]
    .join("\n")
}
