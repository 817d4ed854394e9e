use crate::project::Template;
use crate::uploads::{kind_of, FileKind, UploadedFile};

/// Prompt fragments and final composition for the generation service. All
/// instruction text lives here so the builder and the tests share one
/// source of truth.

fn image_instructions(count: usize) -> String {
    let plural = if count > 1 { "s" } else { "" };
    format!(
        r#"Analyze the uploaded screenshot{plural} and recreate the website design with pixel-perfect accuracy. Study the layout, typography, colors, spacing, components, and overall visual hierarchy. Create a modern, responsive version that captures the essence and functionality of the original design. Pay special attention to:
- Color scheme and gradients
- Typography and font choices
- Layout structure and spacing
- Interactive elements and buttons
- Navigation patterns
- Content organization
- Visual effects and styling

Make it responsive and add smooth animations where appropriate."#
    )
}

fn archive_instructions() -> &'static str {
    r#"Extract and analyze the uploaded ZIP file containing website code/assets. Understand the project structure, examine the HTML, CSS, and JavaScript files, and recreate an improved modern version with:
- Clean, semantic HTML structure
- Modern CSS with responsive design
- Enhanced JavaScript functionality
- Improved performance and accessibility
- Better visual design and UX
- Mobile-first responsive layout

Maintain the core functionality while upgrading the design and code quality."#
}

fn code_instructions() -> &'static str {
    "Analyze the uploaded code files and create an enhanced website based on the existing \
     structure. Improve the code quality, add modern styling, make it responsive, and enhance \
     the user experience while preserving the original functionality."
}

/// Exactly one fragment per accepted batch, chosen by bucket priority
/// image > archive > code; none when every bucket is empty.
pub fn auto_prompt(files: &[UploadedFile]) -> Option<String> {
    let count = |kind: FileKind| {
        files.iter().filter(|f| kind_of(&f.name, &f.content_type) == kind).count()
    };

    let images = count(FileKind::Image);
    if images > 0 {
        return Some(image_instructions(images));
    }
    if count(FileKind::Archive) > 0 {
        return Some(archive_instructions().to_string());
    }
    if count(FileKind::Code) > 0 {
        return Some(code_instructions().to_string());
    }
    None
}

pub fn is_clone_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

pub fn clone_prompt(url: &str) -> String {
    format!(
        r#"Clone and recreate the website from this URL: {url}

Analyze the website thoroughly and recreate it with modern web standards:

**Design Analysis:**
- Study the visual hierarchy, layout, and spacing
- Identify color schemes, typography, and branding
- Analyze navigation patterns and user interface elements
- Note any animations, transitions, or interactive features

**Technical Recreation:**
- Create clean, semantic HTML structure
- Write modern CSS with responsive design (mobile-first)
- Implement interactive features with vanilla JavaScript
- Ensure cross-browser compatibility and accessibility
- Optimize for performance and SEO

**Enhancements:**
- Make it fully responsive across all devices
- Add smooth animations and hover effects
- Improve loading performance
- Enhance user experience with modern UX patterns
- Use modern web technologies and best practices

Create a pixel-perfect recreation that captures the essence of the original while being modern, fast, and responsive."#
    )
}

fn technical_requirements() -> &'static str {
    r#"Requirements:
- Use modern HTML5, CSS3, and vanilla JavaScript
- Make it fully responsive (mobile, tablet, desktop)
- Include beautiful styling with gradients, shadows, and animations
- Use Inter font family from Google Fonts
- Include proper meta tags for SEO
- Make it production-ready
- Add smooth scrolling and hover effects
- Use a modern color palette with gradients
- Include proper semantic HTML structure
- Add some interactive elements like buttons with hover effects
- Make it visually appealing with modern design trends"#
}

fn output_contract() -> &'static str {
    "Return only the complete HTML code with embedded CSS and JavaScript. \
     Start with <!DOCTYPE html> and end with </html>. No prose, no code fences."
}

/// Merges the free-text task, an optional template framing, and the
/// uploaded-file context into the final instruction text.
pub fn compose(task: &str, template: Option<&Template>, files: &[UploadedFile]) -> String {
    let framed = match template {
        Some(t) if task.is_empty() => format!(
            "Create a {} website. Use this as inspiration: {}",
            t.name.to_lowercase(),
            t.description
        ),
        Some(t) => format!(
            "Create a {} website: {}. Use this as inspiration: {}",
            t.name.to_lowercase(),
            task,
            t.description
        ),
        None => task.to_string(),
    };

    let mut file_context = String::new();
    if !files.is_empty() {
        file_context.push_str("\n\nUploaded files context:\n");
        for f in files {
            file_context.push_str(&format!(
                "- {} ({}) - Available at: {}\n",
                f.name, f.content_type, f.public_url
            ));
        }
        file_context.push_str(
            "\nPlease analyze these uploaded files and incorporate their design elements, \
             structure, or content into the website creation.\n",
        );
    }

    format!(
        "Create a complete, modern, responsive website with the following requirements:\n\
         {framed}{file_context}\n\n{}\n\n{}",
        technical_requirements(),
        output_contract()
    )
}
