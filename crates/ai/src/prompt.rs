//! Statement of work and narrative prompt templates.

use sowtrack_core::ProjectView;

/// The contract the dashboard reports against.
pub const SOW_DOCUMENT: &str = r#"
**EllaCap EQ Financial Data Platform - Statement of Work**

**Project Overview:**
Omega Notes will develop a financial data platform (codename "EQ") for Ellacap to streamline internal deal evaluation and portfolio management. The platform will use AI-powered insights to capture, process, and analyze financial documents.

**Total Contract Value:** $40,000
- Phase 1: Features Ready - $10,000 (8-12 weeks)
- Phase 2: Production Ready - $30,000 (8-12 weeks)

**Phase 1 Deliverables:**
- Phase 1A ($2,000): Django backend with REST API, PostgreSQL database, React frontend with TypeScript, Azure infrastructure setup, CI/CD pipeline
- Phase 1B ($2,000): Document upload system, Azure Form Recognizer integration, OpenAI GPT-4 extraction, Data validation pipeline
- Phase 1C ($2,000): Review & confirmation UI, Role-based permissions, Performance optimization, User documentation
- Phase 1 Completion ($4,000): Complete MVP with document ingestion, Financial data extraction, Export functionality

**Phase 2 Deliverables:**
- Phase 2A ($5,000): PE-focused KPI queries, Visual analytics, Deal evaluation framework
- Phase 2B ($5,000): Scenario planning tools, Forward projections, Deal comparison features
- Phase 2C ($5,000): Multi-tenant architecture, Production deployment, Enhanced security & monitoring
- Phase 2 Completion ($15,000): Full production environment, Advanced dashboards, Enhanced AI insights

**Technology Stack:**
- Backend: Python with Django REST Framework
- Database: PostgreSQL with PE-focused schema
- Frontend: React with TypeScript and professional UI components
- AI Services: OpenAI GPT-4 API, Azure Form Recognizer
- Infrastructure: Microsoft Azure (Blob Storage, App Service, Azure Database)
- Authentication: Azure Active Directory B2C

**Key Success Metrics:**
- Complete MVP enabling document ingestion and AI-powered financial data extraction
- Scalable foundation for future commercialization
- Production-ready multi-tenant architecture
- Enhanced AI insights for deal evaluation and portfolio management
"#;

/// System message for the completion request.
pub const SYSTEM_PROMPT: &str = "You are a senior business consultant specializing in private equity \
technology implementations. You excel at translating technical progress into clear business value \
propositions. You write executive summaries that help business leaders understand ROI, risks, and \
strategic value. You never suggest follow-up conversations or additional reports - each summary is \
complete and actionable on its own.";

/// Section headings the narrative must use, in order.
pub const SECTIONS: [&str; 7] = [
    "## 🎯 Executive Summary",
    "## 📊 Current Progress & Milestones",
    "## 💰 Financial Performance",
    "## 🏢 Business Impact & Value Creation",
    "## 🎢 Risks & Mitigations",
    "## 📈 What's Next",
    "## 🎉 Key Wins & Achievements",
];

const SECTION_GUIDANCE: [&str; 7] = [
    "Brief overview of where we stand and what it means for Ellacap's deal evaluation capabilities.",
    "- Overall project completion percentage\n- Which phase we're in and what that delivers\n- Key deliverables completed and their business impact\n- Upcoming milestones and expected completion dates",
    "- Budget utilization vs. progress delivered\n- Value being created relative to investment\n- Cost efficiency analysis\n- Expected ROI timeline",
    "- How completed features improve deal evaluation speed\n- Time savings on document processing and analysis\n- Enhanced data accuracy for investment decisions\n- Competitive advantages being built",
    "- Any schedule or budget concerns\n- Technical risks translated to business impact\n- Mitigation strategies already in place\n- Contingency planning",
    "- Immediate priorities (next 30 days)\n- Phase completion timeline\n- Business capabilities being unlocked\n- Expected outcomes for deal flow efficiency",
    "- Major milestones accomplished\n- Early value being delivered\n- Foundation strength for future scaling\n- Technical debt avoided",
];

/// Build the user message: contract, dashboard JSON, and instructions.
pub fn build_user_prompt(sow: &str, view: &ProjectView) -> Result<String, serde_json::Error> {
    let dashboard = serde_json::to_string_pretty(view)?;

    let mut prompt = String::new();
    prompt.push_str(
        "You are a business consultant creating an executive summary for stakeholders at Ellacap, \
a private equity firm. Your audience consists of business leaders who need to understand project \
progress in clear, business terms without technical jargon.\n\n",
    );
    prompt.push_str("PROJECT CONTEXT:\n");
    prompt.push_str(sow);
    prompt.push_str("\n\nCURRENT DASHBOARD DATA:\n");
    prompt.push_str(&dashboard);
    prompt.push_str(
        "\n\nCreate a comprehensive executive summary that speaks directly to private equity \
professionals. Focus on business value, deal impact, and ROI implications. This is a standalone \
report - do not suggest follow-up conversations or additional reports.\n\n\
Structure your response with these sections:\n",
    );
    for (heading, guidance) in SECTIONS.iter().zip(SECTION_GUIDANCE.iter()) {
        prompt.push('\n');
        prompt.push_str(heading);
        prompt.push('\n');
        prompt.push_str(guidance);
        prompt.push('\n');
    }
    prompt.push_str(
        "\nUse business language throughout. When mentioning technical components, always explain \
their business purpose (e.g., \"secure document storage system that protects confidential deal \
information\" rather than \"Azure Blob Storage implementation\").\n\n\
Focus on outcomes that matter to PE professionals: faster deal evaluation, better data accuracy, \
improved decision-making speed, reduced manual work, enhanced competitive positioning, and scalable \
processes.\n\n\
Keep the tone professional but optimistic, acknowledging challenges while emphasizing solutions and \
progress. This summary should give executives confidence in the investment and clear visibility into \
value creation.",
    );

    Ok(prompt)
}
