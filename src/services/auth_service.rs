// src/services/auth_service.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{PaginacaoQuery, RespostaPaginada},
    db::{AdminFiltros, AdminRepository},
    models::admin::{
        Admin, AdminSeguro, AlterarSenhaPayload, AtualizarAdmin, Claims, LoginPayload, NovoAdmin,
        RegistrarPayload, RespostaLogin, ROLE_ADMIN, ROLE_USER,
    },
};

#[derive(Clone)]
pub struct AuthService {
    admins: AdminRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(admins: AdminRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self {
            admins,
            jwt_secret,
            pool,
        }
    }

    // O primeiro cadastro da base já entra aprovado como ADMIN; os demais
    // ficam pendentes até um admin aprovar.
    pub async fn registrar(&self, payload: RegistrarPayload) -> Result<AdminSeguro, AppError> {
        if self.admins.find_by_login(&payload.login).await?.is_some() {
            return Err(AppError::RegraDeNegocio("Login já está em uso".into()));
        }

        if let Some(ref email) = payload.email {
            if self.admins.find_by_email(email).await?.is_some() {
                return Err(AppError::RegraDeNegocio("Email já está em uso".into()));
            }
        }

        let primeiro = self.admins.count(&AdminFiltros::default()).await? == 0;
        let senha_hash = hash_senha(payload.senha).await?;

        let dados = NovoAdmin {
            login: payload.login,
            senha: senha_hash,
            nome: payload.nome,
            email: payload.email,
            role: if primeiro { ROLE_ADMIN } else { ROLE_USER }.to_string(),
            aprovado: primeiro,
        };

        let admin = self.admins.create(&self.pool, &dados).await?;

        if primeiro {
            tracing::info!(login = %admin.login, "primeiro admin criado, já aprovado como ADMIN");
        }

        Ok(admin)
    }

    // Qualquer porta fechada (login desconhecido, senha errada, conta
    // desativada ou pendente) devolve o mesmo 401 genérico.
    pub async fn login(&self, payload: LoginPayload) -> Result<RespostaLogin, AppError> {
        let admin = self
            .admins
            .find_by_login(&payload.login)
            .await?
            .ok_or(AppError::CredenciaisInvalidas)?;

        if !admin.ativo {
            tracing::warn!(login = %admin.login, "login recusado: conta desativada");
            return Err(AppError::CredenciaisInvalidas);
        }

        if !admin.aprovado {
            tracing::warn!(login = %admin.login, "login recusado: cadastro pendente de aprovação");
            return Err(AppError::CredenciaisInvalidas);
        }

        let senha_confere = verificar_senha(payload.senha, admin.senha.clone()).await?;
        if !senha_confere {
            return Err(AppError::CredenciaisInvalidas);
        }

        let token = gerar_token(&self.jwt_secret, &admin)?;

        Ok(RespostaLogin {
            token,
            admin: admin.into(),
        })
    }

    pub async fn me(&self, id: Uuid) -> Result<AdminSeguro, AppError> {
        self.admins
            .find_by_id_seguro(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Admin não encontrado".into()))
    }

    pub async fn alterar_senha(
        &self,
        id: Uuid,
        payload: AlterarSenhaPayload,
    ) -> Result<(), AppError> {
        let admin = self
            .admins
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Admin não encontrado".into()))?;

        let senha_confere = verificar_senha(payload.senha_atual, admin.senha).await?;
        if !senha_confere {
            return Err(AppError::CredenciaisInvalidas);
        }

        let senha_hash = hash_senha(payload.senha_nova).await?;
        self.admins.update_senha(&self.pool, id, &senha_hash).await
    }

    pub fn validar_token(&self, token: &str) -> Result<Claims, AppError> {
        decodificar_token(&self.jwt_secret, token)
    }

    // ===== GESTÃO DE ADMINS (role ADMIN) =====

    pub async fn listar_admins(
        &self,
        filtros: &AdminFiltros,
        paginacao: &PaginacaoQuery,
    ) -> Result<RespostaPaginada<AdminSeguro>, AppError> {
        let admins = self.admins.find_many(filtros, paginacao).await?;
        let total = self.admins.count(filtros).await?;

        Ok(RespostaPaginada::nova(admins, paginacao, total))
    }

    pub async fn aprovar_admin(&self, id: Uuid) -> Result<AdminSeguro, AppError> {
        let admin = self.buscar_seguro(id).await?;

        if admin.aprovado {
            return Err(AppError::RegraDeNegocio("Usuário já está aprovado".into()));
        }

        let mudancas = AtualizarAdmin {
            aprovado: Some(true),
            ..Default::default()
        };

        self.admins.update(&self.pool, id, &mudancas).await
    }

    // Rejeição só vale para cadastro pendente; conta aprovada sai de
    // circulação via desativação.
    pub async fn rejeitar_admin(&self, id: Uuid) -> Result<(), AppError> {
        let admin = self.buscar_seguro(id).await?;

        if admin.aprovado {
            return Err(AppError::RegraDeNegocio(
                "Não é possível rejeitar usuário já aprovado. Use a desativação.".into(),
            ));
        }

        self.admins.delete(&self.pool, id).await
    }

    pub async fn alterar_role(&self, id: Uuid, role: String) -> Result<AdminSeguro, AppError> {
        self.buscar_seguro(id).await?;

        let mudancas = AtualizarAdmin {
            role: Some(role),
            ..Default::default()
        };

        self.admins.update(&self.pool, id, &mudancas).await
    }

    pub async fn alternar_ativo(&self, id: Uuid) -> Result<AdminSeguro, AppError> {
        let admin = self.buscar_seguro(id).await?;

        let mudancas = AtualizarAdmin {
            ativo: Some(!admin.ativo),
            ..Default::default()
        };

        self.admins.update(&self.pool, id, &mudancas).await
    }

    async fn buscar_seguro(&self, id: Uuid) -> Result<AdminSeguro, AppError> {
        self.admins
            .find_by_id_seguro(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Usuário não encontrado".into()))
    }
}

// bcrypt é caro de propósito; roda fora do executor async.
async fn hash_senha(senha: String) -> Result<String, AppError> {
    let hash = tokio::task::spawn_blocking(move || hash(&senha, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

    Ok(hash)
}

async fn verificar_senha(senha: String, senha_hash: String) -> Result<bool, AppError> {
    let confere = tokio::task::spawn_blocking(move || verify(&senha, &senha_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

    Ok(confere)
}

const DIAS_DE_VALIDADE_DO_TOKEN: i64 = 7;

fn gerar_token(secret: &str, admin: &Admin) -> Result<String, AppError> {
    let agora = Utc::now();
    let expira_em = agora + chrono::Duration::days(DIAS_DE_VALIDADE_DO_TOKEN);

    let claims = Claims {
        sub: admin.id,
        login: admin.login.clone(),
        role: admin.role.clone(),
        exp: expira_em.timestamp() as usize,
        iat: agora.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

fn decodificar_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    let dados = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::TokenInvalido)?;

    Ok(dados.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEGREDO: &str = "um-segredo-de-teste-com-mais-de-32-bytes";

    fn admin_de_teste() -> Admin {
        Admin {
            id: Uuid::new_v4(),
            login: "maria".into(),
            senha: "$2b$12$hash".into(),
            nome: "Maria Souza".into(),
            email: None,
            role: ROLE_ADMIN.into(),
            ativo: true,
            aprovado: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn token_carrega_identidade_e_role() {
        let admin = admin_de_teste();
        let token = gerar_token(SEGREDO, &admin).unwrap();
        let claims = decodificar_token(SEGREDO, &token).unwrap();

        assert_eq!(claims.sub, admin.id);
        assert_eq!(claims.login, "maria");
        assert_eq!(claims.role, ROLE_ADMIN);
    }

    #[test]
    fn token_expira_em_sete_dias() {
        let token = gerar_token(SEGREDO, &admin_de_teste()).unwrap();
        let claims = decodificar_token(SEGREDO, &token).unwrap();

        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn token_de_outro_segredo_e_rejeitado() {
        let token = gerar_token("outro-segredo-igualmente-longo-de-teste", &admin_de_teste())
            .unwrap();

        assert!(matches!(
            decodificar_token(SEGREDO, &token),
            Err(AppError::TokenInvalido)
        ));
    }

    #[test]
    fn token_adulterado_e_rejeitado() {
        let token = gerar_token(SEGREDO, &admin_de_teste()).unwrap();
        let adulterado = format!("{}x", token);

        assert!(matches!(
            decodificar_token(SEGREDO, &adulterado),
            Err(AppError::TokenInvalido)
        ));
    }
}
