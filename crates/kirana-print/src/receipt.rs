//! # Receipt Rendering
//!
//! Formats a Bill plus shop settings into the payload a transport can
//! deliver: plain UTF-8 text for thermal printers, a self-contained HTML
//! document for the system spooler.
//!
//! ## Receipt Layout (both renderers, same order)
//! ```text
//! ┌────────────────────────────────┐
//! │       Sharma Kirana Store      │  shop name / address / phone
//! │        14 MG Road, Pune        │
//! │         Ph: 9822012345         │
//! │     GSTIN: 27AAPFU0939F1ZV     │  only when registered
//! │================================│
//! │           DUPLICATE            │  only on reprints
//! │Bill No: B2C3D479               │  short id + date + cashier
//! │Date: 03-11-2024 14:30          │
//! │--------------------------------│
//! │Basmati Rice 1kg                │  name
//! │  बासमती चावल                   │  local-language subtitle
//! │2 pc x 120.00             240.00│  qty × rate ... amount
//! │--------------------------------│
//! │Subtotal                  390.50│
//! │GST                        19.53│
//! │Round Off                  -0.03│  only when non-zero
//! │================================│
//! │TOTAL                     410.00│
//! │================================│
//! │CGST                        9.76│  the combined tax bisected
//! │SGST                        9.77│  halves sum exactly
//! │                                │
//! │     Thank you! Visit again     │
//! └────────────────────────────────┘
//! ```
//!
//! Rendering is pure: no I/O, no clock reads, fully diff-testable against
//! bill fixtures. Cut/feed command framing is the native driver's concern,
//! not emitted here.

use kirana_core::{Bill, Money, ShopSettings, TaxMode};

// =============================================================================
// Receipt Document
// =============================================================================

/// A rendered receipt, tagged with the payload family it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptDocument {
    /// UTF-8 text stream for thermal transports.
    Thermal(String),
    /// Self-contained HTML document for the system spooler.
    Html(String),
}

// =============================================================================
// Thermal Line Builder
// =============================================================================

/// Fixed-width text assembly for thermal receipts.
struct LineBuilder {
    buf: String,
    width: usize,
}

impl LineBuilder {
    fn new(width: usize) -> Self {
        LineBuilder {
            buf: String::new(),
            width,
        }
    }

    fn line(&mut self, text: &str) {
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    fn center(&mut self, text: &str) {
        let len = text.chars().count();
        if len >= self.width {
            self.line(text);
            return;
        }
        let pad = (self.width - len) / 2;
        self.buf.push_str(&" ".repeat(pad));
        self.line(text);
    }

    fn rule(&mut self) {
        let rule = "-".repeat(self.width);
        self.line(&rule);
    }

    fn double_rule(&mut self) {
        let rule = "=".repeat(self.width);
        self.line(&rule);
    }

    /// Left text with right-aligned value. Overlong pairs fall onto two
    /// lines rather than corrupting the column.
    fn two_col(&mut self, left: &str, right: &str) {
        let lw = left.chars().count();
        let rw = right.chars().count();
        if lw + rw + 1 <= self.width {
            self.buf.push_str(left);
            self.buf.push_str(&" ".repeat(self.width - lw - rw));
            self.line(right);
        } else {
            self.line(left);
            self.buf.push_str(&" ".repeat(self.width.saturating_sub(rw)));
            self.line(right);
        }
    }

    fn finish(self) -> String {
        self.buf
    }
}

/// Round-off display keeps its sign explicit; a silent `0.01` reads like a
/// charge instead of an adjustment.
fn signed(amount: Money) -> String {
    if amount.is_negative() {
        format!("{}", amount)
    } else {
        format!("+{}", amount)
    }
}

// =============================================================================
// Thermal Renderer
// =============================================================================

/// Renders the plain-text receipt for thermal transports.
pub fn render_thermal(bill: &Bill, settings: &ShopSettings, width: usize) -> String {
    let mut b = LineBuilder::new(width);

    // Shop header
    b.center(&settings.shop_name);
    for part in settings.address.lines() {
        b.center(part);
    }
    b.center(&format!("Ph: {}", settings.phone));
    if let Some(gstin) = &settings.gstin {
        b.center(&format!("GSTIN: {}", gstin));
    }
    b.double_rule();

    if bill.print_status.has_printed() {
        b.center("DUPLICATE");
    }

    // Bill identity
    b.line(&format!("Bill No: {}", bill.short_id()));
    b.line(&format!("Date: {}", bill.created_at.format("%d-%m-%Y %H:%M")));
    b.line(&format!("Cashier: {}", bill.created_by));

    if let Some(customer) = &bill.customer {
        b.line(&format!("Customer: {}", customer.name));
        if let Some(phone) = &customer.phone {
            b.line(&format!("Phone: {}", phone));
        }
    }

    // Items
    b.rule();
    for line in &bill.lines {
        b.line(&line.name);
        if let Some(local) = &line.name_local {
            b.line(&format!("  {}", local));
        }
        b.two_col(
            &format!("{} {} x {}", line.quantity, line.unit_label, line.unit_price()),
            &format!("{}", line.gross()),
        );
    }
    b.rule();

    // Totals
    b.two_col("Subtotal", &format!("{}", bill.subtotal));
    b.two_col("GST", &format!("{}", bill.tax_amount));
    if !bill.round_off.is_zero() {
        b.two_col("Round Off", &signed(bill.round_off));
    }
    b.double_rule();
    b.two_col("TOTAL", &format!("{}", bill.grand_total));
    b.double_rule();

    // The combined tax bisected for display; halves sum exactly
    let (cgst, sgst) = bill.tax_amount.split_half();
    b.two_col("CGST", &format!("{}", cgst));
    b.two_col("SGST", &format!("{}", sgst));

    if bill.tax_mode == TaxMode::Inclusive {
        b.center("Prices are GST inclusive");
    }

    b.blank();
    b.center(&settings.footer_message);
    b.blank();

    b.finish()
}

/// Short deterministic self-test payload for "test print".
pub fn test_page(width: usize) -> String {
    let mut b = LineBuilder::new(width);
    b.center("PRINTER TEST");
    b.double_rule();
    b.line("If you can read this, the");
    b.line("printer is set up correctly.");
    b.blank();
    b.finish()
}

// =============================================================================
// HTML Renderer
// =============================================================================

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders the self-contained HTML receipt for the system spooler.
///
/// The only embedded resource is the optional inline logo; nothing is
/// fetched over the network, so printing works fully offline.
pub fn render_html(bill: &Bill, settings: &ShopSettings) -> String {
    let mut h = String::new();

    h.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    h.push_str(&format!("<title>Receipt {}</title>\n", bill.short_id()));
    h.push_str(
        "<style>\n\
         body { font-family: monospace; max-width: 380px; margin: 0 auto; }\n\
         .center { text-align: center; }\n\
         .right { text-align: right; }\n\
         .muted { color: #555; font-size: 0.9em; }\n\
         table { width: 100%; border-collapse: collapse; }\n\
         td { padding: 2px 0; vertical-align: top; }\n\
         .rule { border-top: 1px dashed #000; }\n\
         .total td { border-top: 1px solid #000; border-bottom: 1px solid #000; \
         font-weight: bold; }\n\
         img.logo { max-height: 64px; }\n\
         </style>\n</head>\n<body>\n",
    );

    // Shop header
    h.push_str("<div class=\"center\">\n");
    if let Some(logo) = &settings.logo_base64 {
        h.push_str(&format!(
            "<img class=\"logo\" src=\"data:image/png;base64,{}\" alt=\"\">\n",
            logo
        ));
    }
    h.push_str(&format!("<h2>{}</h2>\n", escape_html(&settings.shop_name)));
    h.push_str(&format!(
        "<p>{}<br>Ph: {}</p>\n",
        escape_html(&settings.address).replace('\n', "<br>"),
        escape_html(&settings.phone)
    ));
    if let Some(gstin) = &settings.gstin {
        h.push_str(&format!("<p>GSTIN: {}</p>\n", escape_html(gstin)));
    }
    h.push_str("</div>\n");

    if bill.print_status.has_printed() {
        h.push_str("<p class=\"center\"><strong>DUPLICATE</strong></p>\n");
    }

    // Bill identity
    h.push_str(&format!(
        "<p>Bill No: {}<br>Date: {}<br>Cashier: {}</p>\n",
        bill.short_id(),
        bill.created_at.format("%d-%m-%Y %H:%M"),
        escape_html(&bill.created_by)
    ));

    if let Some(customer) = &bill.customer {
        h.push_str("<p>Customer: ");
        h.push_str(&escape_html(&customer.name));
        if let Some(phone) = &customer.phone {
            h.push_str(&format!("<br>Phone: {}", escape_html(phone)));
        }
        h.push_str("</p>\n");
    }

    // Items
    h.push_str("<table>\n");
    for line in &bill.lines {
        h.push_str("<tr><td>");
        h.push_str(&escape_html(&line.name));
        if let Some(local) = &line.name_local {
            h.push_str(&format!("<br><span class=\"muted\">{}</span>", escape_html(local)));
        }
        h.push_str(&format!(
            "<br><span class=\"muted\">{} {} x {}</span></td>\
             <td class=\"right\">{}</td></tr>\n",
            line.quantity,
            escape_html(&line.unit_label),
            line.unit_price(),
            line.gross()
        ));
    }
    h.push_str("</table>\n");

    // Totals
    let (cgst, sgst) = bill.tax_amount.split_half();
    h.push_str("<table>\n");
    h.push_str(&format!(
        "<tr class=\"rule\"><td>Subtotal</td><td class=\"right\">{}</td></tr>\n",
        bill.subtotal
    ));
    h.push_str(&format!(
        "<tr><td>GST</td><td class=\"right\">{}</td></tr>\n",
        bill.tax_amount
    ));
    if !bill.round_off.is_zero() {
        h.push_str(&format!(
            "<tr><td>Round Off</td><td class=\"right\">{}</td></tr>\n",
            signed(bill.round_off)
        ));
    }
    h.push_str(&format!(
        "<tr class=\"total\"><td>TOTAL</td><td class=\"right\">{}</td></tr>\n",
        bill.grand_total
    ));
    h.push_str(&format!(
        "<tr><td>CGST</td><td class=\"right\">{}</td></tr>\n",
        cgst
    ));
    h.push_str(&format!(
        "<tr><td>SGST</td><td class=\"right\">{}</td></tr>\n",
        sgst
    ));
    h.push_str("</table>\n");

    if bill.tax_mode == TaxMode::Inclusive {
        h.push_str("<p class=\"center muted\">Prices are GST inclusive</p>\n");
    }

    h.push_str(&format!(
        "<p class=\"center\">{}</p>\n",
        escape_html(&settings.footer_message)
    ));
    h.push_str("</body>\n</html>\n");

    h
}

/// Minimal self-test page for the spooler path.
pub fn test_page_html() -> String {
    "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Printer test</title></head>\n\
     <body><p style=\"font-family:monospace\">If you can read this, the printer is set up \
     correctly.</p></body>\n</html>\n"
        .to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use kirana_core::{BillLine, Customer, Money, PrintStatus, RoundingUnit};

    fn fixture_settings() -> ShopSettings {
        ShopSettings {
            shop_name: "Sharma Kirana Store".to_string(),
            address: "14 MG Road, Pune".to_string(),
            phone: "9822012345".to_string(),
            gstin: Some("27AAPFU0939F1ZV".to_string()),
            logo_base64: None,
            tax_mode: TaxMode::Exclusive,
            rounding_unit: RoundingUnit::Rupee,
            footer_message: "Thank you! Visit again".to_string(),
        }
    }

    fn fixture_bill() -> Bill {
        Bill {
            id: "f47ac10b-58cc-4372-a567-0e02b2c3d479".to_string(),
            lines: vec![
                BillLine {
                    product_id: "p-rice".to_string(),
                    name: "Basmati Rice 1kg".to_string(),
                    name_local: Some("बासमती चावल".to_string()),
                    unit_label: "pc".to_string(),
                    unit_price_paise: 12000,
                    quantity: 2,
                    tax_rate_bps: 500,
                    tax_inclusive: false,
                },
                BillLine {
                    product_id: "p-oil".to_string(),
                    name: "Sunflower Oil 1L".to_string(),
                    name_local: None,
                    unit_label: "pc".to_string(),
                    unit_price_paise: 15050,
                    quantity: 1,
                    tax_rate_bps: 500,
                    tax_inclusive: false,
                },
            ],
            subtotal: Money::from_paise(39050),
            tax_amount: Money::from_paise(1953),
            round_off: Money::from_paise(-3),
            grand_total: Money::from_paise(41000),
            tax_mode: TaxMode::Exclusive,
            customer: None,
            created_at: Utc.with_ymd_and_hms(2024, 11, 3, 14, 30, 0).unwrap(),
            created_by: "asha".to_string(),
            print_status: PrintStatus::NotPrinted,
        }
    }

    /// Full fixture diff of the 32-column thermal receipt.
    #[test]
    fn test_thermal_fixture() {
        let rendered = render_thermal(&fixture_bill(), &fixture_settings(), 32);

        let expected = [
            "      Sharma Kirana Store",
            "        14 MG Road, Pune",
            "         Ph: 9822012345",
            "     GSTIN: 27AAPFU0939F1ZV",
            "================================",
            "Bill No: B2C3D479",
            "Date: 03-11-2024 14:30",
            "Cashier: asha",
            "--------------------------------",
            "Basmati Rice 1kg",
            "  बासमती चावल",
            "2 pc x 120.00             240.00",
            "Sunflower Oil 1L",
            "1 pc x 150.50             150.50",
            "--------------------------------",
            "Subtotal                  390.50",
            "GST                        19.53",
            "Round Off                  -0.03",
            "================================",
            "TOTAL                     410.00",
            "================================",
            "CGST                        9.76",
            "SGST                        9.77",
            "",
            "     Thank you! Visit again",
            "",
        ]
        .join("\n")
            + "\n";

        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_thermal_marks_reprints() {
        let mut bill = fixture_bill();
        assert!(!render_thermal(&bill, &fixture_settings(), 32).contains("DUPLICATE"));

        bill.print_status = PrintStatus::Printed;
        assert!(render_thermal(&bill, &fixture_settings(), 32).contains("DUPLICATE"));

        bill.print_status = PrintStatus::Reprinted;
        assert!(render_thermal(&bill, &fixture_settings(), 32).contains("DUPLICATE"));
    }

    #[test]
    fn test_thermal_omits_zero_round_off() {
        let mut bill = fixture_bill();
        bill.round_off = Money::zero();
        bill.grand_total = Money::from_paise(41003);

        let rendered = render_thermal(&bill, &fixture_settings(), 32);
        assert!(!rendered.contains("Round Off"));
    }

    #[test]
    fn test_thermal_tax_halves_sum_exactly() {
        // Odd tax amount: the halves differ by one paise but sum exactly
        let bill = fixture_bill();
        let rendered = render_thermal(&bill, &fixture_settings(), 32);
        assert!(rendered.contains("CGST"));
        assert!(rendered.contains("9.76"));
        assert!(rendered.contains("9.77"));
    }

    #[test]
    fn test_thermal_customer_block() {
        let mut bill = fixture_bill();
        bill.customer = Some(Customer {
            name: "Ramesh".to_string(),
            phone: Some("9890098900".to_string()),
        });

        let rendered = render_thermal(&bill, &fixture_settings(), 32);
        assert!(rendered.contains("Customer: Ramesh"));
        assert!(rendered.contains("Phone: 9890098900"));
    }

    #[test]
    fn test_thermal_inclusive_note() {
        let mut bill = fixture_bill();
        bill.tax_mode = TaxMode::Inclusive;
        let rendered = render_thermal(&bill, &fixture_settings(), 32);
        assert!(rendered.contains("Prices are GST inclusive"));
    }

    #[test]
    fn test_thermal_no_control_bytes() {
        // Command framing is the driver's concern; the payload is pure text
        let rendered = render_thermal(&fixture_bill(), &fixture_settings(), 32);
        assert!(rendered.chars().all(|c| c == '\n' || !c.is_control()));
    }

    #[test]
    fn test_html_is_self_contained() {
        let mut settings = fixture_settings();
        settings.logo_base64 = Some("aGVsbG8=".to_string());

        let html = render_html(&fixture_bill(), &settings);

        // Inline logo only; no external fetches of any kind
        assert!(html.contains("data:image/png;base64,aGVsbG8="));
        assert!(!html.contains("http://"));
        assert!(!html.contains("https://"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_html_contains_all_receipt_sections() {
        let html = render_html(&fixture_bill(), &fixture_settings());

        assert!(html.contains("Sharma Kirana Store"));
        assert!(html.contains("GSTIN: 27AAPFU0939F1ZV"));
        assert!(html.contains("Bill No: B2C3D479"));
        assert!(html.contains("Basmati Rice 1kg"));
        assert!(html.contains("बासमती चावल"));
        assert!(html.contains("390.50"));
        assert!(html.contains("19.53"));
        assert!(html.contains("-0.03"));
        assert!(html.contains("410.00"));
        assert!(html.contains("9.76"));
        assert!(html.contains("9.77"));
        assert!(html.contains("Thank you! Visit again"));
    }

    #[test]
    fn test_html_escapes_user_text() {
        let mut bill = fixture_bill();
        bill.lines[0].name = "Chips <50g> & Co".to_string();

        let html = render_html(&bill, &fixture_settings());
        assert!(html.contains("Chips &lt;50g&gt; &amp; Co"));
        assert!(!html.contains("<50g>"));
    }

    #[test]
    fn test_two_col_overflow_wraps() {
        let mut b = LineBuilder::new(16);
        b.two_col("A very long product label", "99.00");
        let out = b.finish();
        assert_eq!(out, "A very long product label\n           99.00\n");
    }

    #[test]
    fn test_test_pages() {
        let page = test_page(32);
        assert!(page.contains("PRINTER TEST"));

        let html = test_page_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
