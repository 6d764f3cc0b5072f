//! Draft validation for the admin dialogs.
//!
//! Pure, synchronous rule sets: each returns the first failing rule's
//! display message, or `None` when the draft is acceptable. The dialog
//! workflow re-runs them from scratch on every submit attempt and never
//! lets a failing draft reach a service.

use crate::models::{CondominioDraft, UsuarioDraft};
use crate::workflow::WorkflowMode;

/// Minimum digits for a filled-in phone number (landline)
const TELEFONE_MIN_DIGITOS: usize = 10;

/// Strip a phone mask down to digits; empty input yields `None`.
pub fn limpar_telefone(telefone: &str) -> Option<String> {
    let apenas_numeros: String = telefone.chars().filter(char::is_ascii_digit).collect();
    if apenas_numeros.is_empty() {
        None
    } else {
        Some(apenas_numeros)
    }
}

/// Display mask for stored phone digits. Unrecognized lengths come back
/// unchanged.
pub fn formatar_telefone(telefone: &str) -> String {
    let limpo: String = telefone.chars().filter(char::is_ascii_digit).collect();
    match limpo.len() {
        11 => format!("({}) {}-{}", &limpo[..2], &limpo[2..7], &limpo[7..]),
        10 => format!("({}) {}-{}", &limpo[..2], &limpo[2..6], &limpo[6..]),
        _ => telefone.to_string(),
    }
}

/// Rule set for the condominium dialog, both modes.
pub fn validar_condominio(_mode: WorkflowMode, draft: &CondominioDraft) -> Option<String> {
    if draft.nome_condominio.trim().is_empty() {
        return Some("Nome do condomínio é obrigatório".to_string());
    }
    if draft.cidade_condominio.trim().is_empty() {
        return Some("Cidade é obrigatória".to_string());
    }
    let uf = draft.uf_condominio.trim();
    if uf.chars().count() != 2 {
        return Some("UF deve ter exatamente 2 caracteres".to_string());
    }
    None
}

/// Rule set for the user dialog. Passwords are only required when creating;
/// changing one in edit mode requires the current password alongside it.
pub fn validar_usuario(mode: WorkflowMode, draft: &UsuarioDraft) -> Option<String> {
    if draft.nome.trim().is_empty() {
        return Some("Nome é obrigatório".to_string());
    }
    if draft.email.trim().is_empty() {
        return Some("Email é obrigatório".to_string());
    }
    if mode.is_create() && draft.senha.trim().is_empty() {
        return Some("Senha é obrigatória".to_string());
    }
    if !draft.senha.is_empty() && draft.senha.chars().count() < 6 {
        return Some("Senha deve ter no mínimo 6 caracteres".to_string());
    }
    if mode.is_edit() && !draft.senha.trim().is_empty() && draft.senha_atual.trim().is_empty() {
        return Some("Senha atual é obrigatória para alterar a senha".to_string());
    }
    if draft.id_administradora == 0 {
        return Some("ID Administradora é obrigatório".to_string());
    }
    if !draft.telefone.is_empty() {
        let digitos = limpar_telefone(&draft.telefone).unwrap_or_default();
        if !digitos.is_empty() && digitos.len() < TELEFONE_MIN_DIGITOS {
            return Some("Telefone incompleto".to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn condominio_draft() -> CondominioDraft {
        CondominioDraft {
            id: None,
            nome_condominio: "Edificio A".to_string(),
            endereco_condominio: String::new(),
            cidade_condominio: "Curitiba".to_string(),
            uf_condominio: "PR".to_string(),
            tipo_condominio: String::new(),
        }
    }

    fn usuario_draft() -> UsuarioDraft {
        UsuarioDraft {
            id: Some(7),
            nome: "Ana".to_string(),
            email: "ana@exemplo.com".to_string(),
            telefone: String::new(),
            tipo_acesso: Default::default(),
            id_administradora: 1,
            senha: String::new(),
            senha_atual: String::new(),
        }
    }

    #[test]
    fn test_condominio_nome_obrigatorio() {
        let draft = CondominioDraft {
            nome_condominio: String::new(),
            cidade_condominio: "SP".to_string(),
            uf_condominio: "SP".to_string(),
            ..condominio_draft()
        };
        assert_eq!(
            validar_condominio(WorkflowMode::Create, &draft).as_deref(),
            Some("Nome do condomínio é obrigatório")
        );
    }

    #[test]
    fn test_condominio_uf_exatamente_dois_caracteres() {
        let mut draft = condominio_draft();
        draft.uf_condominio = "PRN".to_string();
        assert_eq!(
            validar_condominio(WorkflowMode::Create, &draft).as_deref(),
            Some("UF deve ter exatamente 2 caracteres")
        );

        draft.uf_condominio = " pr ".to_string();
        assert_eq!(validar_condominio(WorkflowMode::Create, &draft), None);
    }

    #[test]
    fn test_usuario_senha_atual_para_alterar_senha() {
        let mut draft = usuario_draft();
        draft.senha = "novasenha".to_string();
        draft.senha_atual = String::new();
        assert_eq!(
            validar_usuario(WorkflowMode::Edit, &draft).as_deref(),
            Some("Senha atual é obrigatória para alterar a senha")
        );

        draft.senha_atual = "antiga".to_string();
        assert_eq!(validar_usuario(WorkflowMode::Edit, &draft), None);
    }

    #[test]
    fn test_usuario_senha_obrigatoria_apenas_na_criacao() {
        let draft = usuario_draft();
        assert_eq!(
            validar_usuario(WorkflowMode::Create, &draft).as_deref(),
            Some("Senha é obrigatória")
        );
        assert_eq!(validar_usuario(WorkflowMode::Edit, &draft), None);
    }

    #[test]
    fn test_usuario_senha_curta() {
        let mut draft = usuario_draft();
        draft.senha = "12345".to_string();
        assert_eq!(
            validar_usuario(WorkflowMode::Create, &draft).as_deref(),
            Some("Senha deve ter no mínimo 6 caracteres")
        );
    }

    #[test]
    fn test_usuario_telefone_incompleto() {
        let mut draft = usuario_draft();
        draft.telefone = "(41) 9999".to_string();
        assert_eq!(
            validar_usuario(WorkflowMode::Edit, &draft).as_deref(),
            Some("Telefone incompleto")
        );

        draft.telefone = "(41) 99999-0000".to_string();
        assert_eq!(validar_usuario(WorkflowMode::Edit, &draft), None);
    }

    #[test]
    fn test_formatar_telefone() {
        assert_eq!(formatar_telefone("41999990000"), "(41) 99999-0000");
        assert_eq!(formatar_telefone("4133330000"), "(41) 3333-0000");
        assert_eq!(formatar_telefone("123"), "123");
    }

    proptest! {
        #[test]
        fn prop_limpar_telefone_yields_digits_only(input in ".{0,40}") {
            if let Some(limpo) = limpar_telefone(&input) {
                prop_assert!(!limpo.is_empty());
                prop_assert!(limpo.chars().all(|c| c.is_ascii_digit()));
            }
        }

        #[test]
        fn prop_limpar_telefone_idempotent(input in ".{0,40}") {
            if let Some(limpo) = limpar_telefone(&input) {
                prop_assert_eq!(limpar_telefone(&limpo), Some(limpo.clone()));
            }
        }
    }
}
