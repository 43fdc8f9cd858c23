//! Static portfolio content.
//!
//! Read-only records supplied to the sections. The engine never looks at
//! them; sections only use their counts and strings to lay out elements and
//! bind outbound actions.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialLink {
    pub name: &'static str,
    pub url: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Skill {
    pub name: &'static str,
    pub category: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Education {
    pub degree: &'static str,
    pub institution: &'static str,
    pub grade: &'static str,
    pub period: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectLinks {
    pub source: &'static str,
    pub live: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub title: &'static str,
    pub role: &'static str,
    pub tech: &'static [&'static str],
    pub description: &'static str,
    pub color: &'static str,
    pub links: ProjectLinks,
}

#[derive(Debug, Clone, Serialize)]
pub struct Experience {
    pub title: &'static str,
    pub organization: &'static str,
    pub period: &'static str,
    pub location: &'static str,
    pub description: &'static str,
    pub achievements: &'static [&'static str],
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactInfo {
    pub email: &'static str,
    pub phone: &'static str,
}

/// Everything the page shows.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub role: &'static str,
    pub initials: &'static str,
    pub nav: Vec<NavItem>,
    pub socials: Vec<SocialLink>,
    pub skills: Vec<Skill>,
    pub education: Education,
    pub projects: Vec<Project>,
    pub experiences: Vec<Experience>,
    pub contact: ContactInfo,
}

impl Content {
    /// Distinct skill categories, in first-seen order.
    pub fn skill_categories(&self) -> Vec<&'static str> {
        let mut categories = Vec::new();
        for skill in &self.skills {
            if !categories.contains(&skill.category) {
                categories.push(skill.category);
            }
        }
        categories
    }
}

impl Default for Content {
    fn default() -> Self {
        Self {
            first_name: "AVERY",
            last_name: "NASH",
            role: "Full Stack Developer & AI Engineer",
            initials: "AN",
            nav: vec![
                NavItem { label: "About", href: "#about" },
                NavItem { label: "Projects", href: "#projects" },
                NavItem { label: "Leadership", href: "#leadership" },
                NavItem { label: "Contact", href: "#contact" },
            ],
            socials: vec![
                SocialLink {
                    name: "LinkedIn",
                    url: "https://www.linkedin.com/in/example",
                    color: "#0077b5",
                },
                SocialLink {
                    name: "GitHub",
                    url: "https://github.com/example",
                    color: "#ffffff",
                },
                SocialLink {
                    name: "HashNode",
                    url: "https://hashnode.com/@example",
                    color: "#3aff7d",
                },
            ],
            skills: vec![
                Skill { name: "TypeScript", category: "Languages" },
                Skill { name: "JavaScript", category: "Languages" },
                Skill { name: "Python", category: "Languages" },
                Skill { name: "C/C++", category: "Languages" },
                Skill { name: "React.js", category: "Web" },
                Skill { name: "Next.js", category: "Web" },
                Skill { name: "Node.js", category: "Web" },
                Skill { name: "MongoDB", category: "Web" },
                Skill { name: "SQL", category: "Web" },
                Skill { name: "Tailwind CSS", category: "Web" },
                Skill { name: "NLP", category: "AI/ML" },
                Skill { name: "RAG", category: "AI/ML" },
                Skill { name: "LangChain", category: "AI/ML" },
                Skill { name: "Vector Embeddings", category: "AI/ML" },
            ],
            education: Education {
                degree: "B.Tech in Information Technology",
                institution: "Institute of Technology",
                grade: "8.23",
                period: "Aug 2023 - Present",
            },
            projects: vec![
                Project {
                    title: "Metro Route Finder",
                    role: "Software Developer",
                    tech: &["C++", "Graph Algorithms", "Dijkstra"],
                    description: "Route finder for a metro network. Shortest and fastest paths \
                                  with a heap-based priority queue and interchange detection.",
                    color: "#3aff7d",
                    links: ProjectLinks {
                        source: "https://github.com/example/metro-app",
                        live: None,
                    },
                },
                Project {
                    title: "PDF Assistant",
                    role: "Full Stack Developer",
                    tech: &["Node.js", "Next.js", "RAG", "BullMQ", "QdrantDB"],
                    description: "Retrieval-augmented question answering over PDFs, with an \
                                  async ingestion pipeline running on Redis workers.",
                    color: "#00d4ff",
                    links: ProjectLinks {
                        source: "https://github.com/example/pdf-chat-rag",
                        live: None,
                    },
                },
                Project {
                    title: "ScholesAgent",
                    role: "AI / Quant Engineer",
                    tech: &["Python", "Django", "Black-Scholes Model", "Agent Architecture"],
                    description: "Option-pricing agent computing European call and put prices \
                                  and explaining volatility impact in plain language.",
                    color: "#ff6b6b",
                    links: ProjectLinks {
                        source: "https://github.com/example/scholes-agent",
                        live: Some("https://scholes-agent.example.com/"),
                    },
                },
                Project {
                    title: "QuickDrop",
                    role: "Chrome Extension Developer",
                    tech: &["JavaScript", "Chrome APIs", "Local Storage"],
                    description: "Browser extension that saves URLs, text and images to local \
                                  storage behind a small task dashboard.",
                    color: "#ffd93d",
                    links: ProjectLinks {
                        source: "https://github.com/example/quickdrop",
                        live: None,
                    },
                },
            ],
            experiences: vec![
                Experience {
                    title: "Event Coordinator",
                    organization: "Inter-Institute Sports Meet",
                    period: "2024",
                    location: "Gwalior, India",
                    description: "Ran the athletics segment of a multi-day sports meet: race \
                                  scheduling, lane allocation and results.",
                    achievements: &[
                        "Managed 10+ participating institutes",
                        "Coordinated 50+ events seamlessly",
                        "Ensured zero operational delays",
                    ],
                    color: "#3aff7d",
                },
                Experience {
                    title: "Game Event Coordinator",
                    organization: "Campus Festival",
                    period: "2024",
                    location: "Gwalior, India",
                    description: "Led the multi-games section of a campus festival with \
                                  parallel activities and a large turnout.",
                    achievements: &[
                        "Managed 5+ parallel activities",
                        "Engaged 100+ participants",
                        "Achieved 95% satisfaction rate",
                    ],
                    color: "#00d4ff",
                },
            ],
            contact: ContactInfo {
                email: "hello@example.com",
                phone: "+10000000000",
            },
        }
    }
}
