/// Fixed internal names a participant attribute is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalField {
    FullName,
    FirstName,
    MiddleName,
    LastName,
    Gender,
    DateOfBirth,
    Email,
    Phone,
    Address,
    Degree,
    Institution,
    GraduationYear,
    Position,
    Company,
    YearsOfExperience,
    PositionDescription,
    ExpertiseDomain,
    HowHeard,
    Objectives,
    Expectations,
    AdditionalComments,
    DrinkPreference,
    TermsAccepted,
    DataUsageAccepted,
    FutureInfoAccepted,
    SubmittedAt,
    CreatedAt,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 27] = [
        CanonicalField::FullName,
        CanonicalField::FirstName,
        CanonicalField::MiddleName,
        CanonicalField::LastName,
        CanonicalField::Gender,
        CanonicalField::DateOfBirth,
        CanonicalField::Email,
        CanonicalField::Phone,
        CanonicalField::Address,
        CanonicalField::Degree,
        CanonicalField::Institution,
        CanonicalField::GraduationYear,
        CanonicalField::Position,
        CanonicalField::Company,
        CanonicalField::YearsOfExperience,
        CanonicalField::PositionDescription,
        CanonicalField::ExpertiseDomain,
        CanonicalField::HowHeard,
        CanonicalField::Objectives,
        CanonicalField::Expectations,
        CanonicalField::AdditionalComments,
        CanonicalField::DrinkPreference,
        CanonicalField::TermsAccepted,
        CanonicalField::DataUsageAccepted,
        CanonicalField::FutureInfoAccepted,
        CanonicalField::SubmittedAt,
        CanonicalField::CreatedAt,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            CanonicalField::FullName => "full_name",
            CanonicalField::FirstName => "first_name",
            CanonicalField::MiddleName => "middle_name",
            CanonicalField::LastName => "last_name",
            CanonicalField::Gender => "gender",
            CanonicalField::DateOfBirth => "date_of_birth",
            CanonicalField::Email => "email",
            CanonicalField::Phone => "phone",
            CanonicalField::Address => "address",
            CanonicalField::Degree => "degree",
            CanonicalField::Institution => "institution",
            CanonicalField::GraduationYear => "graduation_year",
            CanonicalField::Position => "position",
            CanonicalField::Company => "company",
            CanonicalField::YearsOfExperience => "years_of_experience",
            CanonicalField::PositionDescription => "position_description",
            CanonicalField::ExpertiseDomain => "expertise_domain",
            CanonicalField::HowHeard => "how_heard",
            CanonicalField::Objectives => "objectives",
            CanonicalField::Expectations => "expectations",
            CanonicalField::AdditionalComments => "additional_comments",
            CanonicalField::DrinkPreference => "drink_preference",
            CanonicalField::TermsAccepted => "terms_accepted",
            CanonicalField::DataUsageAccepted => "data_usage_accepted",
            CanonicalField::FutureInfoAccepted => "future_info_accepted",
            CanonicalField::SubmittedAt => "submitted_at",
            CanonicalField::CreatedAt => "created_at",
        }
    }

    /// Slugified raw keys accepted for this field, most specific first.
    ///
    /// Covers the spreadsheet question labels, the registration form's
    /// camelCase keys, the column names of older databases and the
    /// canonical name itself.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            CanonicalField::FullName => &["nom_complet", "full_name", "nom_et_prenom", "name"],
            CanonicalField::FirstName => &["prenom", "first_name", "firstname"],
            CanonicalField::MiddleName => &["postnom", "post_nom", "middle_name"],
            CanonicalField::LastName => &["nom", "last_name", "lastname"],
            CanonicalField::Gender => &["genre", "sexe", "gender"],
            CanonicalField::DateOfBirth => &[
                "datenaissance",
                "date_naissance",
                "date_de_naissance",
                "date_of_birth",
            ],
            CanonicalField::Email => &[
                "email",
                "e_mail",
                "adresse_email",
                "adresse_e_mail",
                "email_address",
            ],
            CanonicalField::Phone => &[
                "contact_number",
                "telephone",
                "numero_de_telephone",
                "phone",
                "phone_number",
            ],
            CanonicalField::Address => &["adresse", "address"],
            CanonicalField::Degree => &["diplome", "degree", "niveau_etude"],
            CanonicalField::Institution => &["etablissement", "institution"],
            CanonicalField::GraduationYear => {
                &["anneeobtention", "annee_obtention", "graduation_year"]
            }
            CanonicalField::Position => &["poste", "position"],
            CanonicalField::Company => &["entreprise", "company"],
            CanonicalField::YearsOfExperience => &[
                "anneesexperience",
                "annees_experience",
                "annee_experience",
                "years_of_experience",
                "experience",
            ],
            CanonicalField::PositionDescription => &[
                "descriptionposte",
                "description_poste",
                "position_description",
            ],
            CanonicalField::ExpertiseDomain => &[
                "veuillez_selectionner_votre_domaine_d_expertise",
                "expertise_domain",
                "expertise",
                "domaine",
            ],
            CanonicalField::HowHeard => &[
                "comment_avez_vous_entendu_parler_de_l_evenement_go_talent",
                "commententendu",
                "comment_entendu",
                "how_heard",
            ],
            CanonicalField::Objectives => {
                &["quel_s_objectif_s_avez_vous_en_participant", "objectives"]
            }
            CanonicalField::Expectations => &[
                "merci_de_preciser_ce_que_vous_attendez_de_cette_conference_contenu_contacts_suivi_etc",
                "attentes",
                "expectations",
            ],
            CanonicalField::AdditionalComments => &[
                "commentairessupplementaires",
                "commentaires_supplementaires",
                "additional_comments",
            ],
            CanonicalField::DrinkPreference => &["boisson", "drink_preference", "drink"],
            CanonicalField::TermsAccepted => &["acceptetermes", "accepte_termes", "terms_accepted"],
            CanonicalField::DataUsageAccepted => &[
                "accepteutilisationdonnees",
                "accepte_utilisation_donnees",
                "data_usage_accepted",
            ],
            CanonicalField::FutureInfoAccepted => &[
                "souhaiteinformationsfutures",
                "souhaite_informations_futures",
                "future_info_accepted",
            ],
            CanonicalField::SubmittedAt => &["timestamp", "horodateur", "submitted_at"],
            CanonicalField::CreatedAt => &["created_at"],
        }
    }
}
