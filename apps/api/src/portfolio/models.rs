use serde::{Deserialize, Serialize};

/// The four taxonomy buckets. Iteration order is fixed: core, technical, tools, soft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordCategory {
    Core,
    Technical,
    Tools,
    Soft,
}

impl KeywordCategory {
    pub const ALL: [KeywordCategory; 4] = [
        KeywordCategory::Core,
        KeywordCategory::Technical,
        KeywordCategory::Tools,
        KeywordCategory::Soft,
    ];

    /// Core and technical hits must show up in an application; tools and soft are nice to have.
    pub fn is_critical(self) -> bool {
        matches!(self, KeywordCategory::Core | KeywordCategory::Technical)
    }
}

/// Portfolio keyword taxonomy. Keywords keep their configured spelling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordTaxonomy {
    #[serde(default)]
    pub core: Vec<String>,
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
}

impl KeywordTaxonomy {
    pub fn keywords(&self, category: KeywordCategory) -> &[String] {
        match category {
            KeywordCategory::Core => &self.core,
            KeywordCategory::Technical => &self.technical,
            KeywordCategory::Tools => &self.tools,
            KeywordCategory::Soft => &self.soft,
        }
    }

    pub fn len(&self) -> usize {
        KeywordCategory::ALL
            .iter()
            .map(|c| self.keywords(*c).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceSummary {
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// The owner's profile as configured. Every field is optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioProfile {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub location: String,
    pub years_experience: Option<u32>,
    pub skills: Vec<String>,
    pub projects: Vec<ProjectSummary>,
    pub experience: Vec<ExperienceSummary>,
}

impl PortfolioProfile {
    /// Compact plain-text rendering used as the portfolio summary in prompts.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        let headline = match (self.name.trim(), self.title.trim()) {
            ("", "") => None,
            (name, "") => Some(name.to_string()),
            ("", title) => Some(title.to_string()),
            (name, title) => Some(format!("{name} — {title}")),
        };
        if let Some(headline) = headline {
            lines.push(headline);
        }
        if let Some(years) = self.years_experience {
            lines.push(format!("Experience: {years}+ years"));
        }
        if !self.location.trim().is_empty() {
            lines.push(format!("Location: {}", self.location.trim()));
        }
        if !self.bio.trim().is_empty() {
            lines.push(format!("Bio: {}", self.bio.trim()));
        }
        if !self.skills.is_empty() {
            lines.push(format!("Skills: {}", self.skills.join(", ")));
        }
        if !self.experience.is_empty() {
            lines.push("Roles:".to_string());
            for exp in &self.experience {
                let mut line = format!("- {}", exp.role);
                if !exp.company.is_empty() {
                    line.push_str(&format!(" at {}", exp.company));
                }
                if !exp.highlights.is_empty() {
                    line.push_str(&format!(": {}", exp.highlights.join("; ")));
                }
                lines.push(line);
            }
        }
        if !self.projects.is_empty() {
            lines.push("Projects:".to_string());
            for project in &self.projects {
                let mut line = format!("- {}", project.name);
                if !project.description.is_empty() {
                    line.push_str(&format!(": {}", project.description));
                }
                if !project.technologies.is_empty() {
                    line.push_str(&format!(" [{}]", project.technologies.join(", ")));
                }
                lines.push(line);
            }
        }

        lines.join("\n")
    }
}

/// Everything the analyzer needs to know about the portfolio owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    #[serde(default)]
    pub profile: PortfolioProfile,
    #[serde(default)]
    pub keywords: KeywordTaxonomy,
}
