// src/common/contact.rs

use validator::ValidateEmail;

use crate::common::error::AppError;

// O contato do comprador é um campo livre: telefone ou e-mail. A decisão de
// qual formato validar segue o primeiro caractere digitado, igual à máscara
// do formulário: dígito ou '(' indica telefone, o resto é tratado como e-mail.
pub fn looks_like_phone(raw: &str) -> bool {
    raw.chars().next().is_some_and(|c| c.is_ascii_digit() || c == '(')
}

/// Valida o contato opcional do comprador.
///
/// Telefones precisam de pelo menos 10 dígitos (DDD + número) depois de
/// remover a máscara; e-mails passam pela validação do `validator`.
pub fn validate_buyer_contact(raw: &str) -> Result<(), AppError> {
    if looks_like_phone(raw) {
        let digits = raw.chars().filter(char::is_ascii_digit).count();
        if digits < 10 {
            return Err(AppError::InvalidInput(
                "Telefone inválido (mínimo 10 dígitos com DDD)".to_string(),
            ));
        }
        return Ok(());
    }

    if !raw.validate_email() {
        return Err(AppError::InvalidInput("E-mail inválido".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telefone_com_mascara_e_aceito() {
        assert!(validate_buyer_contact("(11) 99999-9999").is_ok());
        assert!(validate_buyer_contact("11999999999").is_ok());
    }

    #[test]
    fn telefone_curto_e_rejeitado() {
        assert!(validate_buyer_contact("(11) 9999").is_err());
        assert!(validate_buyer_contact("999").is_err());
    }

    #[test]
    fn email_valido_e_aceito() {
        assert!(validate_buyer_contact("comprador@atletica.com.br").is_ok());
    }

    #[test]
    fn email_malformado_e_rejeitado() {
        assert!(validate_buyer_contact("comprador@").is_err());
        assert!(validate_buyer_contact("sem-arroba").is_err());
    }

    #[test]
    fn heuristica_decide_pelo_primeiro_caractere() {
        assert!(looks_like_phone("(11) 98765-4321"));
        assert!(looks_like_phone("11987654321"));
        assert!(!looks_like_phone("fulano@exemplo.com"));
    }
}
