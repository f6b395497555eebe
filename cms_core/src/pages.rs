//! HTML pages, built as strings.
//!
//! The markup mirrors the small set of views this app needs: a listing, two
//! forms, a signin form, and a wrapper for rendered markdown. User-controlled
//! text always goes through [`escape_html`] on the way in.

/// Escapes text for safe interpolation into HTML bodies and attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, body: &str, message: Option<&str>, username: Option<&str>) -> String {
    let flash = match message {
        Some(text) => format!("<p class=\"message\">{}</p>\n", escape_html(text)),
        None => String::new(),
    };

    let status_bar = match username {
        Some(name) => format!(
            "<p>Signed in as {}.</p>\n\
             <form class=\"inline\" method=\"post\" action=\"/users/signout\">\
             <button type=\"submit\">Sign Out</button></form>",
            escape_html(name)
        ),
        None => "<p><a href=\"/users/signin\">Sign In</a></p>".to_string(),
    };

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         {flash}\
         <main>\n{body}\n</main>\n\
         <footer>\n{status_bar}\n</footer>\n\
         </body>\n\
         </html>\n",
        title = escape_html(title),
        flash = flash,
        body = body,
        status_bar = status_bar,
    )
}

/// The document listing at `/`.
pub fn index(names: &[String], message: Option<&str>, username: Option<&str>) -> String {
    let mut body = String::from("<ul>\n");
    for name in names {
        let escaped = escape_html(name);
        body.push_str(&format!(
            "<li><a href=\"/{name}\">{name}</a>\n\
             <a href=\"/{name}/edit\">edit</a>\n\
             <form class=\"inline\" method=\"post\" action=\"/{name}/delete\">\
             <button type=\"submit\">Delete</button></form></li>\n",
            name = escaped,
        ));
    }
    body.push_str("</ul>\n<p><a href=\"/new\">New Document</a></p>");

    layout("CMS", &body, message, username)
}

/// The create-document form at `/new`.
pub fn new_document(message: Option<&str>, username: Option<&str>) -> String {
    let body = "<form method=\"post\" action=\"/create\">\n\
                <label for=\"filename\">Add a new document:</label>\n\
                <input name=\"filename\" id=\"filename\" autofocus>\n\
                <button type=\"submit\">Create</button>\n\
                </form>";

    layout("New Document", body, message, username)
}

/// The edit form at `/:filename/edit`, pre-filled with current content.
pub fn edit_document(
    name: &str,
    content: &str,
    message: Option<&str>,
    username: Option<&str>,
) -> String {
    let body = format!(
        "<p>Edit content of {name}:</p>\n\
         <form method=\"post\" action=\"/{name}\">\n\
         <textarea name=\"content\" rows=\"20\" cols=\"100\">{content}</textarea>\n\
         <button type=\"submit\">Save Changes</button>\n\
         </form>",
        name = escape_html(name),
        content = escape_html(content),
    );

    layout(name, &body, message, username)
}

/// The signin form. `prefill` carries the submitted username back into the
/// form after a failed attempt.
pub fn signin(prefill: &str, message: Option<&str>, username: Option<&str>) -> String {
    let body = format!(
        "<form method=\"post\" action=\"/users/signin\">\n\
         <label for=\"username\">Username:</label>\n\
         <input name=\"username\" id=\"username\" value=\"{}\">\n\
         <label for=\"password\">Password:</label>\n\
         <input type=\"password\" name=\"password\" id=\"password\">\n\
         <button type=\"submit\">Sign In</button>\n\
         </form>",
        escape_html(prefill),
    );

    layout("Sign In", &body, message, username)
}

/// A rendered markdown fragment wrapped in the page layout.
pub fn markdown_page(
    name: &str,
    fragment: &str,
    message: Option<&str>,
    username: Option<&str>,
) -> String {
    layout(name, fragment, message, username)
}
