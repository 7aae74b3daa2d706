//! HTML bodies and subjects of the registration emails. Every interpolated
//! value is escaped.

use healtharmy_core::notify::RegistrationNotice;

pub const CONFIRMATION_SUBJECT: &str = "Bem-vindo ao Health Army - Cadastro Confirmado";

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
    .container { max-width: 600px; margin: 0 auto; padding: 20px; }
    .header { background: linear-gradient(to right, #53245c, #33b9cb); color: white; padding: 20px; border-radius: 8px 8px 0 0; }
    .content { background: #f9f9f9; padding: 20px; border-radius: 0 0 8px 8px; }
    .info-box { background: white; border-left: 4px solid #33b9cb; padding: 15px; margin: 10px 0; }
    .footer { text-align: center; margin-top: 20px; font-size: 12px; color: #666; }
"#;

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn admin_subject(notice: &RegistrationNotice) -> String {
    format!("[Health Army] Novo Voluntário Cadastrado: {}", notice.full_name)
}

fn page(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <style>{STYLE}</style>
</head>
<body>
  <div class="container">
{body}
  </div>
</body>
</html>
"#
    )
}

/// Confirmation sent to the volunteer who just registered.
pub fn confirmation_email(notice: &RegistrationNotice) -> String {
    let name = escape_html(&notice.full_name);
    let email = escape_html(&notice.email);

    page(&format!(
        r#"    <div class="header">
      <h1>Bem-vindo ao Health Army!</h1>
      <p>Obrigado por se voluntariar</p>
    </div>
    <div class="content">
      <h2>Olá {name},</h2>
      <p>Seu cadastro foi realizado com sucesso! Estamos muito felizes em tê-lo como voluntário do Health Army.</p>
      <h3>Próximos Passos:</h3>
      <ul>
        <li>Nossa equipe entrará em contato em breve para confirmar seus dados</li>
        <li>Você receberá um convite para acessar o Google Agenda</li>
        <li>Poderá gerenciar sua disponibilidade de horários</li>
      </ul>
      <p><strong>Dados do Cadastro:</strong></p>
      <p>Email: {email}</p>
      <p>Atenciosamente,<br><strong>Equipe Health Army</strong></p>
    </div>
    <div class="footer">
      <p>Health Army. Todos os direitos reservados.</p>
    </div>"#
    ))
}

/// Alert sent to the administrator address.
pub fn admin_alert_email(notice: &RegistrationNotice) -> String {
    let name = escape_html(&notice.full_name);
    let specialization = escape_html(&notice.specialization);
    let project = escape_html(notice.project.label());

    page(&format!(
        r#"    <div class="header">
      <h1>Novo Voluntário Cadastrado</h1>
      <p>Notificação do Sistema Health Army</p>
    </div>
    <div class="content">
      <h2>Um novo voluntário se cadastrou!</h2>
      <div class="info-box">
        <p><strong>Nome:</strong> {name}</p>
        <p><strong>Especialidade:</strong> {specialization}</p>
        <p><strong>Projeto:</strong> {project}</p>
      </div>
      <p>Acesse o painel administrativo para visualizar todos os detalhes e gerenciar o cadastro.</p>
      <p>Atenciosamente,<br><strong>Sistema Health Army</strong></p>
    </div>"#
    ))
}
