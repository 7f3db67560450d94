//! Payment Page Views
//!
//! The payment pages are plain server-rendered HTML: the payer lands here
//! from a shared link, presses one button, and leaves for the gateway's
//! hosted checkout. Everything user-supplied is HTML-escaped.

use axum::response::Html;
use studio_payments::{InactiveReason, PaymentLink};

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <meta name=\"robots\" content=\"noindex\">\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n{body}\n</body>\n\
         </html>\n",
        title = escape(title),
    ))
}

/// The payable view: amount, description, and the pay button
pub fn payment_page(link: &PaymentLink) -> Html<String> {
    let discount_row = if link.discount > rust_decimal::Decimal::ZERO {
        format!(
            "<p>Original price: <s>{} {}</s></p>\n\
             <p>Discount: {} {}</p>\n",
            link.original_amount,
            link.currency,
            link.discount,
            link.currency,
        )
    } else {
        String::new()
    };

    let body = format!(
        "<h1>Payment for {client}</h1>\n\
         <p>{description}</p>\n\
         {discount_row}\
         <p><strong>Amount due: {amount} {currency}</strong></p>\n\
         <form method=\"post\" action=\"/pay/{id}/invoice\">\n\
         <button type=\"submit\">Pay {amount} {currency}</button>\n\
         </form>\n",
        client = escape(&link.client_name),
        description = escape(&link.description),
        amount = link.final_amount(),
        currency = link.currency,
        id = link.unique_id,
    );
    layout("Payment", &body)
}

/// The inactive view: paid, expired, or deactivated
pub fn inactive_page(link: &PaymentLink, reason: InactiveReason) -> Html<String> {
    let body = format!(
        "<h1>Payment unavailable</h1>\n\
         <p>{message}</p>\n\
         <p>Link for {client}, amount {amount} {currency}.</p>\n",
        message = reason.message(),
        client = escape(&link.client_name),
        amount = link.final_amount(),
        currency = link.currency,
    );
    layout("Payment unavailable", &body)
}

/// Post-checkout landing page.
///
/// The webhook, not this redirect, is what marks a link paid, so the page
/// reports the recorded status rather than assuming success.
pub fn success_page(link: &PaymentLink) -> Html<String> {
    let body = if link.status == studio_payments::LinkStatus::Paid {
        format!(
            "<h1>Thank you!</h1>\n\
             <p>Payment of {amount} {currency} received.</p>\n",
            amount = link.final_amount(),
            currency = link.currency,
        )
    } else {
        "<h1>Thank you!</h1>\n\
         <p>Your payment is being processed. This page will reflect the \
         result once the bank confirms it.</p>\n"
            .to_string()
    };
    layout("Payment received", &body)
}

/// Shown when invoice creation fails
pub fn failure_page(message: &str) -> Html<String> {
    let body = format!(
        "<h1>Payment failed</h1>\n\
         <p>{message}</p>\n\
         <p>You can go back and try again.</p>\n",
        message = escape(message),
    );
    layout("Payment failed", &body)
}
